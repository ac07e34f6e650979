use anyhow::Result;
use serde::Serialize;

use gomatrix_lib::platform::resolve::host_platform;
use gomatrix_lib::platform::{Platform, current_platform};
use gomatrix_lib::toolchain::ToolchainEnv;

use super::{Context, runtime};
use crate::output::{OutputFormat, Status, emit_json, field};

#[derive(Debug, Serialize)]
struct PlatformsJson {
  host: Option<Platform>,
  current: Option<Platform>,
  server: Vec<Platform>,
  client: Vec<Platform>,
  test: Vec<Platform>,
}

fn join(platforms: &[Platform]) -> String {
  platforms.iter().map(Platform::to_string).collect::<Vec<_>>().join(" ")
}

pub fn cmd_platforms(ctx: &Context, output: OutputFormat) -> Result<()> {
  let rt = runtime()?;
  // the configured sets are still worth printing without a toolchain
  let host = match rt.block_on(host_platform(&ctx.toolchain, &ToolchainEnv::new())) {
    Ok(host) => Some(host),
    Err(e) => {
      Status::Warn.report(format_args!("Cannot determine host platform: {}", e));
      None
    }
  };
  let current = match host {
    Some(host) => Some(current_platform(
      host,
      ctx.overrides.goos.as_deref(),
      ctx.overrides.goarch.as_deref(),
    )?),
    None => None,
  };

  let sets = &ctx.config.platforms;
  if output.is_json() {
    return emit_json(&PlatformsJson {
      host,
      current,
      server: sets.server.clone(),
      client: sets.client.clone(),
      test: sets.test.clone(),
    });
  }

  let unknown = || "unknown".to_string();
  field("Host", host.map(|p| p.to_string()).unwrap_or_else(unknown));
  field("Current", current.map(|p| p.to_string()).unwrap_or_else(unknown));
  field("Server", join(&sets.server));
  field("Client", join(&sets.client));
  field("Test", join(&sets.test));
  Ok(())
}

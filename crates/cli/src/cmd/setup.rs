use anyhow::Result;
use serde::Serialize;

use gomatrix_lib::setup::setup_environment;

use super::{Context, runtime};
use crate::output::{OutputFormat, Status, emit_json, field};

#[derive(Debug, Serialize)]
struct SetupJson {
  workspace_root: String,
  gopath: String,
  host: String,
  goroot: Option<String>,
}

pub fn cmd_setup(ctx: &Context, output: OutputFormat) -> Result<()> {
  let rt = runtime()?;
  let env = rt.block_on(setup_environment(&ctx.config, &ctx.overrides, &ctx.toolchain))?;

  if output.is_json() {
    return emit_json(&SetupJson {
      workspace_root: env.workspace_root.display().to_string(),
      gopath: env.gopath.to_string_lossy().into_owned(),
      host: env.host.to_string(),
      goroot: env.goroot.as_ref().map(|p| p.display().to_string()),
    });
  }

  Status::Done.report("Build environment ready");
  field("Workspace", env.workspace_root.display());
  field("GOPATH", env.gopath.to_string_lossy());
  field("Host", env.host);
  match &env.goroot {
    Some(goroot) => field("GOROOT", goroot.display()),
    None => field("GOROOT", "unknown"),
  }
  Ok(())
}

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use serde::Serialize;

use gomatrix_lib::place::place_binaries;
use gomatrix_lib::platform::Platform;
use gomatrix_lib::platform::resolve::host_platform;
use gomatrix_lib::setup::BinLayout;
use gomatrix_lib::toolchain::ToolchainEnv;

use super::{Context, runtime};
use crate::output::{ARROW, OutputFormat, Status, emit_json};

#[derive(Debug, Serialize)]
struct PlaceJson {
  dest: String,
  placed: Vec<PlacedJson>,
  skipped: Vec<String>,
}

#[derive(Debug, Serialize)]
struct PlacedJson {
  platform: String,
  dest: String,
  files: usize,
}

/// Copies already-built binaries into `<dir>/<os>/<arch>/`.
pub fn cmd_place(ctx: &Context, dir: Option<PathBuf>, platforms: Vec<Platform>, output: OutputFormat) -> Result<()> {
  let dest = dir.unwrap_or_else(|| ctx.config.output.join("bin"));
  let platforms = if platforms.is_empty() {
    ctx.config.platforms.client.clone()
  } else {
    platforms
  };

  let rt = runtime()?;
  let host = rt
    .block_on(host_platform(&ctx.toolchain, &ToolchainEnv::new()))
    .context("Failed to query the host platform")?;
  let layout = BinLayout {
    bin_root: ctx.config.gopath_root().join("bin"),
    host,
  };

  let report = place_binaries(&layout, &platforms, &dest)
    .with_context(|| format!("Failed to place binaries into {}", dest.display()))?;

  if output.is_json() {
    return emit_json(&PlaceJson {
      dest: dest.display().to_string(),
      placed: report
        .placed
        .iter()
        .map(|p| PlacedJson {
          platform: p.platform.to_string(),
          dest: p.dest.display().to_string(),
          files: p.files.len(),
        })
        .collect(),
      skipped: report.skipped.iter().map(Platform::to_string).collect(),
    });
  }

  for placed in &report.placed {
    Status::Done.report(format_args!(
      "{} {} {} ({} file(s))",
      placed.platform,
      ARROW,
      placed.dest.display(),
      placed.files.len()
    ));
  }
  for platform in &report.skipped {
    Status::Note.report(format_args!("{}: not built", platform));
  }
  Ok(())
}

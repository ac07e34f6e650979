//! Implementation of the `gomatrix build` command.
//!
//! Builds the requested targets for the requested platforms and, optionally,
//! places the results into a per-platform output tree.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use anyhow::{Context as _, Result};
use clap::Args;
use serde::Serialize;

use gomatrix_lib::build::{BuildReport, BuildRequest, InvocationMode, build_binaries};
use gomatrix_lib::place::place_binaries;
use gomatrix_lib::platform::Platform;

use super::{Context, runtime};
use crate::output::{ARROW, OutputFormat, Status, emit_json, field};

#[derive(Args, Debug)]
pub struct BuildArgs {
  /// Use `go install` and let the toolchain place binaries
  #[arg(long)]
  pub install: bool,

  /// Platform to build for (repeatable); defaults to GOMATRIX_BUILD_PLATFORMS or the current platform
  #[arg(long = "platform", value_name = "OS/ARCH")]
  pub platforms: Vec<Platform>,

  /// After building, copy client-platform binaries into DIR/<os>/<arch>/
  #[arg(long, value_name = "DIR")]
  pub place: Option<PathBuf>,

  /// Output format
  #[arg(short = 'o', long, value_enum, default_value = "text")]
  pub output: OutputFormat,

  /// Targets (paths or short names) and go flags (anything starting with '-'); put options before these
  #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "TARGET|FLAG")]
  pub args: Vec<String>,
}

#[derive(Debug, Serialize)]
struct PairJson {
  target: String,
  platform: String,
  artifact: Option<String>,
  error: Option<String>,
}

#[derive(Debug, Serialize)]
struct BuildJson {
  success: bool,
  mode: String,
  platforms: Vec<String>,
  results: Vec<PairJson>,
  placed: Option<usize>,
}

/// Splits positional arguments into target identifiers and toolchain flags.
pub fn split_args(args: &[String]) -> (Vec<String>, Vec<String>) {
  args.iter().cloned().partition(|a| !a.starts_with('-'))
}

pub fn cmd_build(ctx: &Context, args: BuildArgs) -> Result<ExitCode> {
  let (ids, flags) = split_args(&args.args);

  let mut goflags = ctx.overrides.goflags.clone();
  goflags.extend(flags);

  let platforms = if args.platforms.is_empty() {
    ctx.overrides.build_platforms.clone()
  } else {
    args.platforms
  };

  let request = BuildRequest {
    targets: ctx.registry.resolve(&ids),
    platforms,
    goflags,
    mode: if args.install {
      InvocationMode::Install
    } else {
      InvocationMode::Build
    },
  };

  let rt = runtime()?;
  let started = Instant::now();
  let report = rt.block_on(build_binaries(
    &ctx.config,
    &ctx.overrides,
    &ctx.registry,
    &ctx.toolchain,
    &request,
  ))?;
  let elapsed = started.elapsed();

  let placed = match &args.place {
    Some(dir) => {
      let placed = place_binaries(&report.layout, &ctx.config.platforms.client, dir)
        .with_context(|| format!("Failed to place binaries into {}", dir.display()))?;
      Some(placed.file_count())
    }
    None => None,
  };

  if args.output.is_json() {
    emit_json(&to_json(&report, placed))?;
  } else {
    report_outcomes(&report);
    if let (Some(count), Some(dir)) = (placed, &args.place) {
      Status::Note.report(format_args!("Placed {} file(s) into {}", count, dir.display()));
    }
    println!();
    field("Succeeded", report.succeeded().count());
    field("Failed", report.failures().count());
    field("Elapsed", format_elapsed(elapsed));
  }

  if report.is_success() {
    Ok(ExitCode::SUCCESS)
  } else {
    Ok(ExitCode::FAILURE)
  }
}

fn report_outcomes(report: &BuildReport) {
  for outcome in &report.outcomes {
    match &outcome.result {
      Ok(Some(path)) => Status::Done.report(format_args!(
        "{} ({}) {} {}",
        outcome.target,
        outcome.platform,
        ARROW,
        path.display()
      )),
      Ok(None) => Status::Done.report(format_args!("{} ({})", outcome.target, outcome.platform)),
      Err(e) => Status::Failed.report(e),
    }
  }
}

/// Wall-clock time of a build run: `850ms`, `12.4s` or `3m07s`.
fn format_elapsed(elapsed: Duration) -> String {
  let secs = elapsed.as_secs();
  if secs >= 60 {
    format!("{}m{:02}s", secs / 60, secs % 60)
  } else if secs > 0 {
    format!("{:.1}s", elapsed.as_secs_f64())
  } else {
    format!("{}ms", elapsed.as_millis())
  }
}

fn to_json(report: &BuildReport, placed: Option<usize>) -> BuildJson {
  BuildJson {
    success: report.is_success(),
    mode: report.mode.to_string(),
    platforms: report.platforms.iter().map(Platform::to_string).collect(),
    results: report
      .outcomes
      .iter()
      .map(|o| PairJson {
        target: o.target.path().to_string(),
        platform: o.platform.to_string(),
        artifact: o
          .result
          .as_ref()
          .ok()
          .and_then(|p| p.as_ref())
          .map(|p| p.display().to_string()),
        error: o.result.as_ref().err().map(|e| e.to_string()),
      })
      .collect(),
    placed,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn flags_are_separated_from_targets() {
    let args: Vec<String> = ["cmd/ctl", "-race", "apiserver", "-tags=netgo"]
      .iter()
      .map(|s| s.to_string())
      .collect();
    let (ids, flags) = split_args(&args);
    assert_eq!(ids, vec!["cmd/ctl", "apiserver"]);
    assert_eq!(flags, vec!["-race", "-tags=netgo"]);
  }

  #[test]
  fn elapsed_time_is_compact() {
    assert_eq!(format_elapsed(Duration::from_millis(850)), "850ms");
    assert_eq!(format_elapsed(Duration::from_millis(12_400)), "12.4s");
    assert_eq!(format_elapsed(Duration::from_secs(187)), "3m07s");
  }
}

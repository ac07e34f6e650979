//! Build matrix execution.
//!
//! [`build_binaries`] runs setup, then builds every requested target for
//! every requested platform, one invocation at a time:
//! - platforms in caller order, each bracketed by a [`PlatformScope`]
//! - static targets get `CGO_ENABLED=0` and `-installsuffix cgo`
//! - every binary gets the same version stamp
//!
//! A failing pair is recorded and the matrix carries on; the report folds all
//! outcomes into one verdict.

pub mod stdlib;
pub mod types;

use std::path::Path;

use tracing::{debug, error, info, warn};

pub use types::{Binary, BuildError, BuildReport, BuildRequest, InvocationMode, PairOutcome};

use crate::config::{Config, EnvOverrides};
use crate::consts::STATIC_INSTALL_SUFFIX;
use crate::platform::{Platform, PlatformScope, current_platform, resolve_platforms};
use crate::registry::{BuildMode, Registry, Target};
use crate::setup::{SetupError, setup_environment};
use crate::toolchain::{Toolchain, ToolchainEnv};
use crate::version::VersionInfo;

/// Settings shared by every invocation in one build.
struct Job<'a> {
  package: &'a str,
  goflags: &'a [String],
  ldflags: &'a str,
  goroot: Option<&'a Path>,
  workspace_root: &'a Path,
  mode: InvocationMode,
}

/// Builds `request.targets` × `request.platforms`.
///
/// Only setup failures are returned as errors; per-pair failures are in the
/// report.
pub async fn build_binaries<T: Toolchain>(
  config: &Config,
  overrides: &EnvOverrides,
  registry: &Registry,
  toolchain: &T,
  request: &BuildRequest,
) -> Result<BuildReport, SetupError> {
  let mut env = setup_environment(config, overrides, toolchain).await?;

  let targets = if request.targets.is_empty() {
    registry.all_targets()
  } else {
    request.targets.clone()
  };
  let current = current_platform(env.host, overrides.goos.as_deref(), overrides.goarch.as_deref())?;
  let platforms = resolve_platforms(&request.platforms, current);

  let ldflags = VersionInfo::detect(&config.source_root, overrides)
    .await
    .ldflags(&config.package);

  info!(
    targets = targets.len(),
    platforms = %platforms.iter().map(Platform::to_string).collect::<Vec<_>>().join(" "),
    mode = %request.mode,
    "starting build"
  );

  let job = Job {
    package: &config.package,
    goflags: &request.goflags,
    ldflags: &ldflags,
    goroot: env.goroot.as_deref(),
    workspace_root: &env.workspace_root,
    mode: request.mode,
  };

  let mut outcomes = Vec::with_capacity(targets.len() * platforms.len());
  for &platform in &platforms {
    // both modes leave binaries here, so this is also where stale ones live
    let artifact_dir = env.layout.dir_for(platform);
    let scope = PlatformScope::acquire(&mut env.toolchain_env, platform);
    let out_dir = match request.mode {
      InvocationMode::Build => Some(artifact_dir.as_path()),
      InvocationMode::Install => None,
    };

    info!(platform = %platform, "building platform");
    for target in &targets {
      let binary = Binary::new(target, platform);
      let result = build_one(toolchain, &scope, &job, target, &binary, out_dir).await;
      match &result {
        Ok(_) => info!(target = %target, platform = %platform, "build succeeded"),
        Err(e) => {
          error!(target = %target, platform = %platform, error = %e, "build failed");
          discard_stale_output(&artifact_dir.join(binary.file_name()));
        }
      }
      outcomes.push(PairOutcome {
        target: target.clone(),
        platform,
        binary,
        result,
      });
    }
  }

  let report = BuildReport {
    mode: request.mode,
    platforms,
    outcomes,
    layout: env.layout.clone(),
  };
  info!(
    succeeded = report.succeeded().count(),
    failed = report.failures().count(),
    "build finished"
  );
  Ok(report)
}

async fn build_one<T: Toolchain>(
  toolchain: &T,
  env: &ToolchainEnv,
  job: &Job<'_>,
  target: &Target,
  binary: &Binary,
  out_dir: Option<&Path>,
) -> Result<Option<std::path::PathBuf>, BuildError> {
  let static_build = target.mode() == BuildMode::Static;
  let cgo_env;
  let env = if static_build {
    match job.goroot {
      Some(goroot) => stdlib::exit_if_stdlib_not_installed(goroot, binary.platform)?,
      None => debug!(target = %target, "GOROOT unknown; skipping prebuilt stdlib check"),
    }
    cgo_env = env.with("CGO_ENABLED", "0");
    &cgo_env
  } else {
    env
  };

  let output = match out_dir {
    Some(dir) => {
      std::fs::create_dir_all(dir).map_err(|source| BuildError::OutputDir {
        path: dir.to_path_buf(),
        source,
      })?;
      Some(dir.join(binary.file_name()))
    }
    None => None,
  };

  let args = toolchain_args(job, target, static_build, output.as_deref());
  match toolchain.run(&args, env, Some(job.workspace_root)).await {
    Ok(_) => Ok(output),
    Err(source) => Err(BuildError::CompileFailure {
      target: target.path().to_string(),
      platform: binary.platform,
      source,
    }),
  }
}

/// Arguments for one `go build`/`go install`, package last.
fn toolchain_args(job: &Job<'_>, target: &Target, static_build: bool, output: Option<&Path>) -> Vec<String> {
  let mut args = Vec::new();
  match (job.mode, output) {
    (InvocationMode::Build, Some(path)) => {
      args.push("build".to_string());
      args.push("-o".to_string());
      args.push(path.display().to_string());
    }
    _ => args.push("install".to_string()),
  }
  args.extend(job.goflags.iter().cloned());
  if static_build {
    args.push("-installsuffix".to_string());
    args.push(STATIC_INSTALL_SUFFIX.to_string());
  }
  args.push("-ldflags".to_string());
  args.push(job.ldflags.to_string());
  args.push(format!("{}/{}", job.package, target.path()));
  args
}

/// A failed pair must not leave a binary behind, whether a truncated one from
/// this run or a complete one from an earlier run.
fn discard_stale_output(path: &Path) {
  match std::fs::remove_file(path) {
    Ok(()) => warn!(path = %path.display(), "removed output of failed build"),
    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
    Err(e) => warn!(path = %path.display(), error = %e, "could not remove partial output"),
  }
}

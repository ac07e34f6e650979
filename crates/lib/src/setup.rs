//! Build environment setup.
//!
//! Prepares everything a toolchain invocation needs before any build runs:
//! - Links `<output>/go/src/<package>` to the real source tree
//! - Checks that `go` is installed and recent enough
//! - Composes `GOPATH` and clears `GOBIN`
//! - Records the host platform and `GOROOT`
//!
//! Every failure here is fatal for the invocation. Nothing is retried.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{Config, ConfigError, EnvOverrides};
use crate::consts::{GO_INSTALL_DOCS, GODEPS_WORKSPACE};
use crate::platform::{Platform, PlatformError};
use crate::platform::resolve::host_platform;
use crate::toolchain::{Toolchain, ToolchainEnv, ToolchainError};
use crate::util::fs::{link_dir, remove_entry};

#[derive(Debug, Error)]
pub enum SetupError {
  #[error("cannot find the go toolchain ('{program}'); install it from {} and make sure it is on PATH", GO_INSTALL_DOCS)]
  ToolchainNotFound { program: String },

  #[error("detected go version {detected}; go {minimum} or greater is required")]
  ToolchainVersionTooOld { detected: String, minimum: String },

  #[error("could not determine the go version from: {output}")]
  ToolchainVersionUnparseable { output: String },

  #[error("toolchain query failed: {0}")]
  Toolchain(#[from] ToolchainError),

  #[error("failed to {action} {}: {source}", path.display())]
  Filesystem {
    action: &'static str,
    path: PathBuf,
    source: std::io::Error,
  },

  #[error("invalid GOPATH entry: {0}")]
  InvalidGopath(String),

  #[error("invalid platform override: {0}")]
  Platform(#[from] PlatformError),

  #[error(transparent)]
  Config(#[from] ConfigError),
}

impl SetupError {
  /// Process exit code for this failure.
  pub fn exit_code(&self) -> i32 {
    match self {
      Self::ToolchainNotFound { .. }
      | Self::ToolchainVersionTooOld { .. }
      | Self::ToolchainVersionUnparseable { .. } => 2,
      _ => 1,
    }
  }
}

fn fs_err<'a>(action: &'static str, path: &'a Path) -> impl FnOnce(std::io::Error) -> SetupError + 'a {
  move |source| SetupError::Filesystem {
    action,
    path: path.to_path_buf(),
    source,
  }
}

/// Where the toolchain leaves binaries for each platform.
///
/// Host binaries go straight into `<gopath>/bin`; every other platform gets a
/// `<gopath>/bin/<os>_<arch>` subdirectory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinLayout {
  pub bin_root: PathBuf,
  pub host: Platform,
}

impl BinLayout {
  pub fn dir_for(&self, platform: Platform) -> PathBuf {
    if platform == self.host {
      self.bin_root.clone()
    } else {
      self.bin_root.join(platform.dir_name())
    }
  }
}

/// Result of a successful setup.
#[derive(Debug, Clone)]
pub struct BuildEnv {
  /// `<output>/go/src/<package>`, linked to the source tree.
  pub workspace_root: PathBuf,
  /// `<output>/go`, absolute.
  pub gopath_root: PathBuf,
  pub gopath: OsString,
  /// Environment for every toolchain invocation in this build.
  pub toolchain_env: ToolchainEnv,
  pub host: Platform,
  /// `None` when `go env GOROOT` reported nothing.
  pub goroot: Option<PathBuf>,
  pub layout: BinLayout,
}

/// Creates the workspace root link and returns its path.
///
/// Any existing entry at the link path is replaced. Safe to repeat, not safe
/// to run concurrently against the same output directory.
pub fn create_workspace_root(config: &Config) -> Result<PathBuf, SetupError> {
  let source = dunce::canonicalize(&config.source_root).map_err(fs_err("resolve source root", &config.source_root))?;

  let root = config.gopath_root().join("src").join(&config.package);
  let parent = root
    .parent()
    .ok_or_else(|| SetupError::InvalidGopath(root.display().to_string()))?;
  std::fs::create_dir_all(parent).map_err(fs_err("create directory", parent))?;

  remove_entry(&root).map_err(fs_err("remove existing workspace root", &root))?;
  link_dir(&source, &root).map_err(fs_err("link workspace root", &root))?;

  info!(workspace_root = %root.display(), source = %source.display(), "linked workspace root");
  Ok(root)
}

/// Fails unless the toolchain is installed and (outside CI) recent enough.
pub async fn verify_toolchain<T: Toolchain>(
  config: &Config,
  overrides: &EnvOverrides,
  toolchain: &T,
  env: &ToolchainEnv,
) -> Result<(), SetupError> {
  let program = toolchain.locate().map_err(|e| match e {
    ToolchainError::NotFound { program } => SetupError::ToolchainNotFound { program },
    other => SetupError::Toolchain(other),
  })?;
  debug!(program = %program.display(), "found go toolchain");

  if overrides.ci {
    debug!("CI environment detected; skipping go version check");
    return Ok(());
  }

  let minimum = config.min_version()?;
  let detected = toolchain.version(env).await.map_err(|e| match e {
    ToolchainError::UnexpectedOutput { output, .. } => SetupError::ToolchainVersionUnparseable { output },
    other => SetupError::Toolchain(other),
  })?;

  if !detected.satisfies(&minimum) {
    return Err(SetupError::ToolchainVersionTooOld {
      detected: detected.to_string(),
      minimum: minimum.to_string(),
    });
  }

  info!(version = %detected, minimum = %minimum, "go version ok");
  Ok(())
}

/// `<output>/go` [+ extra] [+ vendored workspace], in search order.
pub fn compose_gopath(
  gopath_root: &Path,
  source_root: &Path,
  overrides: &EnvOverrides,
) -> Result<OsString, SetupError> {
  let mut entries = vec![gopath_root.to_path_buf()];
  if let Some(extra) = &overrides.extra_gopath {
    entries.push(extra.clone());
  }
  if !overrides.no_godeps {
    entries.push(source_root.join(GODEPS_WORKSPACE));
  }
  std::env::join_paths(&entries).map_err(|e| SetupError::InvalidGopath(e.to_string()))
}

/// Runs the full setup sequence.
pub async fn setup_environment<T: Toolchain>(
  config: &Config,
  overrides: &EnvOverrides,
  toolchain: &T,
) -> Result<BuildEnv, SetupError> {
  let workspace_root = create_workspace_root(config)?;

  let mut env = ToolchainEnv::new();
  // nothing inherited from the caller's shell may redirect the build
  env.remove("GOBIN");
  env.remove("GOOS");
  env.remove("GOARCH");

  verify_toolchain(config, overrides, toolchain, &env).await?;

  let gopath_root = dunce::canonicalize(config.gopath_root()).map_err(fs_err("resolve", &config.gopath_root()))?;
  let source_root = dunce::canonicalize(&config.source_root).map_err(fs_err("resolve source root", &config.source_root))?;
  let gopath = compose_gopath(&gopath_root, &source_root, overrides)?;
  env.set("GOPATH", gopath.clone());
  info!(gopath = ?gopath, "exported GOPATH");

  let host = host_platform(toolchain, &env).await?;
  let goroot = toolchain.go_env("GOROOT", &env).await?;
  let goroot = if goroot.is_empty() {
    warn!("go env GOROOT is empty; static builds will skip the prebuilt standard library check");
    None
  } else {
    Some(PathBuf::from(goroot))
  };
  debug!(host = %host, goroot = ?goroot, "toolchain environment");

  let layout = BinLayout {
    bin_root: gopath_root.join("bin"),
    host,
  };

  Ok(BuildEnv {
    workspace_root,
    gopath_root,
    gopath,
    toolchain_env: env,
    host,
    goroot,
    layout,
  })
}

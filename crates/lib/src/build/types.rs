//! Types for build execution.
//!
//! Defines the request, per-pair outcomes and errors of a build matrix run.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::platform::Platform;
use crate::registry::Target;
use crate::setup::BinLayout;
use crate::toolchain::ToolchainError;

/// How the toolchain places its output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InvocationMode {
  /// `go build -o <dir>/<name>`; we choose the output location.
  #[default]
  Build,
  /// `go install`; the toolchain chooses the output location.
  Install,
}

impl fmt::Display for InvocationMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Build => write!(f, "build"),
      Self::Install => write!(f, "install"),
    }
  }
}

#[derive(Debug, Clone, Default)]
pub struct BuildRequest {
  /// Empty means every target in the registry.
  pub targets: Vec<Target>,
  /// Empty means the current platform.
  pub platforms: Vec<Platform>,
  /// Extra flags passed to every `go build`/`go install`.
  pub goflags: Vec<String>,
  pub mode: InvocationMode,
}

/// The output of building one target for one platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binary {
  pub name: String,
  pub platform: Platform,
}

impl Binary {
  pub fn new(target: &Target, platform: Platform) -> Self {
    Self {
      name: target.name().to_string(),
      platform,
    }
  }

  /// Name on disk, with `.exe` for Windows platforms.
  pub fn file_name(&self) -> String {
    self.platform.exe_name(&self.name)
  }
}

/// Errors for a single (target, platform) pair.
#[derive(Debug, Error)]
pub enum BuildError {
  /// Static builds need the platform's cgo-free standard library, and we may
  /// not build it into a shared GOROOT on the user's behalf.
  #[error(
    "the {platform} standard library for static builds is missing at {} and {} is not writable; build it once with:\n  {fix}",
    expected.display(),
    pkg_dir.display()
  )]
  StdlibPrebuiltMissing {
    platform: Platform,
    expected: PathBuf,
    pkg_dir: PathBuf,
    fix: String,
  },

  #[error("failed to build {target} for {platform}: {source}")]
  CompileFailure {
    target: String,
    platform: Platform,
    #[source]
    source: ToolchainError,
  },

  #[error("failed to prepare output directory {}: {source}", path.display())]
  OutputDir { path: PathBuf, source: std::io::Error },
}

#[derive(Debug)]
pub struct PairOutcome {
  pub target: Target,
  pub platform: Platform,
  pub binary: Binary,
  /// Where the binary was written, when we chose the location.
  pub result: Result<Option<PathBuf>, BuildError>,
}

impl PairOutcome {
  pub fn is_success(&self) -> bool {
    self.result.is_ok()
  }
}

/// Outcome of a whole build matrix.
#[derive(Debug)]
pub struct BuildReport {
  pub mode: InvocationMode,
  pub platforms: Vec<Platform>,
  pub outcomes: Vec<PairOutcome>,
  pub layout: BinLayout,
}

impl BuildReport {
  /// True only if every pair built.
  pub fn is_success(&self) -> bool {
    self.outcomes.iter().all(PairOutcome::is_success)
  }

  pub fn succeeded(&self) -> impl Iterator<Item = &PairOutcome> {
    self.outcomes.iter().filter(|o| o.is_success())
  }

  pub fn failures(&self) -> impl Iterator<Item = &PairOutcome> {
    self.outcomes.iter().filter(|o| !o.is_success())
  }
}

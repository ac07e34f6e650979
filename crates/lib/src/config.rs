//! Build configuration.
//!
//! Settings come from an optional `gomatrix.toml` (inventory, package path,
//! directories, minimum toolchain version) layered with per-invocation
//! environment overrides. Every field has a default, so an empty file and no
//! file at all are both valid.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::consts::*;
use crate::platform::{Arch, Os, Platform, PlatformError, parse_platform_list};

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read config {}: {source}", path.display())]
  Read { path: PathBuf, source: std::io::Error },

  #[error("failed to parse config {}: {source}", path.display())]
  Parse { path: PathBuf, source: toml::de::Error },

  #[error("invalid minimum go version '{0}'")]
  MinGoVersion(String),

  #[error("invalid platform in {var}: {source}")]
  Platform { var: &'static str, source: PlatformError },

  #[error("unbalanced quoting in {var}: {value}")]
  Quoting { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
  /// Import path of the repository root (e.g. `example.com/monorepo`).
  pub package: String,
  /// Real source tree the workspace root links to.
  pub source_root: PathBuf,
  /// Output base; everything the build writes lives beneath it.
  pub output: PathBuf,
  pub min_go_version: String,
  pub targets: TargetsConfig,
  pub platforms: PlatformsConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TargetsConfig {
  pub server: Vec<String>,
  pub client: Vec<String>,
  pub test: Vec<String>,
  /// Short names of targets that must be linked statically.
  pub static_linked: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlatformsConfig {
  pub server: Vec<Platform>,
  pub client: Vec<Platform>,
  pub test: Vec<Platform>,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      package: DEFAULT_PACKAGE.to_string(),
      source_root: PathBuf::from("."),
      output: PathBuf::from(DEFAULT_OUTPUT_DIR),
      min_go_version: DEFAULT_MIN_GO_VERSION.to_string(),
      targets: TargetsConfig::default(),
      platforms: PlatformsConfig::default(),
    }
  }
}

impl Default for TargetsConfig {
  fn default() -> Self {
    let owned = |names: &[&str]| names.iter().map(|s| s.to_string()).collect();
    Self {
      server: owned(&[
        "cmd/apiserver",
        "cmd/controller-manager",
        "cmd/scheduler",
        "cmd/proxy",
        "cmd/nodeagent",
      ]),
      client: owned(&["cmd/ctl"]),
      test: owned(&["cmd/integration", "cmd/e2e-runner", "test/e2e/e2e.test"]),
      static_linked: owned(&["apiserver", "controller-manager", "scheduler"]),
    }
  }
}

impl Default for PlatformsConfig {
  fn default() -> Self {
    use Arch::*;
    use Os::*;

    Self {
      server: vec![Platform::new(Linux, Amd64)],
      client: vec![
        Platform::new(Linux, Amd64),
        Platform::new(Linux, I386),
        Platform::new(Linux, Arm),
        Platform::new(Darwin, Amd64),
        Platform::new(Darwin, I386),
        Platform::new(Windows, Amd64),
        Platform::new(Windows, I386),
      ],
      test: vec![Platform::new(Linux, Amd64), Platform::new(Darwin, Amd64)],
    }
  }
}

impl Config {
  /// Loads `path`, or the defaults when `path` is `None`.
  pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
    let Some(path) = path else {
      return Ok(Self::default());
    };
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    let config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })?;
    debug!(path = %path.display(), package = %config.package, "loaded config");
    Ok(config)
  }

  pub fn min_version(&self) -> Result<semver::Version, ConfigError> {
    crate::toolchain::GoVersion::parse_minimum(&self.min_go_version)
      .ok_or_else(|| ConfigError::MinGoVersion(self.min_go_version.clone()))
  }

  /// `<output>/go`, the root of the toolchain workspace.
  pub fn gopath_root(&self) -> PathBuf {
    self.output.join(GOPATH_SUBDIR)
  }
}

/// Per-invocation settings taken from the process environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
  pub goos: Option<String>,
  pub goarch: Option<String>,
  pub extra_gopath: Option<PathBuf>,
  pub no_godeps: bool,
  /// A CI marker is present; toolchain version validation is skipped.
  pub ci: bool,
  pub build_platforms: Vec<Platform>,
  pub goflags: Vec<String>,
  pub go: Option<PathBuf>,
  pub output: Option<PathBuf>,
  pub git_version: Option<String>,
  pub git_commit: Option<String>,
  pub git_tree_state: Option<String>,
}

impl EnvOverrides {
  pub fn from_env() -> Result<Self, ConfigError> {
    let build_platforms = match var(ENV_BUILD_PLATFORMS) {
      Some(list) => parse_platform_list(&list).map_err(|source| ConfigError::Platform {
        var: ENV_BUILD_PLATFORMS,
        source,
      })?,
      None => Vec::new(),
    };

    let goflags = match var(ENV_GOFLAGS) {
      Some(flags) => split_flags(ENV_GOFLAGS, &flags)?,
      None => Vec::new(),
    };

    Ok(Self {
      goos: var(ENV_GOOS),
      goarch: var(ENV_GOARCH),
      extra_gopath: var(ENV_EXTRA_GOPATH).map(PathBuf::from),
      no_godeps: var(ENV_NO_GODEPS).is_some(),
      ci: CI_MARKERS.iter().any(|marker| var(marker).is_some()),
      build_platforms,
      goflags,
      go: var(ENV_GO).map(PathBuf::from),
      output: var(ENV_OUTPUT).map(PathBuf::from),
      git_version: var(ENV_GIT_VERSION),
      git_commit: var(ENV_GIT_COMMIT),
      git_tree_state: var(ENV_GIT_TREE_STATE),
    })
  }
}

/// Splits a shell-quoted flag string, keeping quoted arguments intact.
pub fn split_flags(var: &'static str, value: &str) -> Result<Vec<String>, ConfigError> {
  shlex::split(value).ok_or_else(|| ConfigError::Quoting {
    var,
    value: value.to_string(),
  })
}

/// Non-empty value of an environment variable.
fn var(key: &str) -> Option<String> {
  std::env::var(key).ok().filter(|v| !v.is_empty())
}

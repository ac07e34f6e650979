//! Target platforms.
//!
//! A [`Platform`] is an `os/arch` pair as understood by the Go toolchain
//! (`GOOS`/`GOARCH`). The canonical string form is `linux/amd64`; the form
//! used for directory names is `linux_amd64`.

pub mod arch;
pub mod os;
pub mod resolve;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use arch::Arch;
pub use os::Os;
pub use resolve::{PlatformScope, current_platform, resolve_platforms};

/// Errors produced while parsing platform identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
  #[error("unknown operating system: {0}")]
  UnknownOs(String),

  #[error("unknown architecture: {0}")]
  UnknownArch(String),

  #[error("invalid platform '{0}': expected os/arch")]
  Malformed(String),
}

/// Platform identifier combining OS and architecture (e.g., "linux/amd64")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Platform {
  pub os: Os,
  pub arch: Arch,
}

impl Platform {
  pub fn new(os: Os, arch: Arch) -> Self {
    Self { os, arch }
  }

  /// Directory-safe form with `/` replaced by `_` (e.g., "linux_amd64")
  pub fn dir_name(&self) -> String {
    format!("{}_{}", self.os, self.arch)
  }

  /// File name the toolchain produces for an executable called `name`
  pub fn exe_name(&self, name: &str) -> String {
    format!("{}{}", name, self.os.exe_suffix())
  }
}

impl fmt::Display for Platform {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}/{}", self.os, self.arch)
  }
}

impl FromStr for Platform {
  type Err = PlatformError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let (os, arch) = s
      .trim()
      .split_once('/')
      .ok_or_else(|| PlatformError::Malformed(s.to_string()))?;
    if arch.contains('/') {
      return Err(PlatformError::Malformed(s.to_string()));
    }
    Ok(Self {
      os: os.parse()?,
      arch: arch.parse()?,
    })
  }
}

impl TryFrom<String> for Platform {
  type Error = PlatformError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

impl From<Platform> for String {
  fn from(value: Platform) -> Self {
    value.to_string()
  }
}

/// Parses a whitespace separated list of platforms, preserving order.
pub fn parse_platform_list(list: &str) -> Result<Vec<Platform>, PlatformError> {
  list.split_whitespace().map(str::parse).collect()
}

use std::fmt;
use std::str::FromStr;

use super::PlatformError;

/// Operating systems the Go toolchain can be asked to target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Os {
  Linux,
  Darwin,
  Windows,
  FreeBsd,
}

impl Os {
  /// Returns the `GOOS` identifier for this OS
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Linux => "linux",
      Self::Darwin => "darwin",
      Self::Windows => "windows",
      Self::FreeBsd => "freebsd",
    }
  }

  /// Executable suffix the toolchain appends for this OS
  pub fn exe_suffix(&self) -> &'static str {
    match self {
      Self::Windows => ".exe",
      _ => "",
    }
  }
}

impl fmt::Display for Os {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for Os {
  type Err = PlatformError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "linux" => Ok(Self::Linux),
      "darwin" => Ok(Self::Darwin),
      "windows" => Ok(Self::Windows),
      "freebsd" => Ok(Self::FreeBsd),
      other => Err(PlatformError::UnknownOs(other.to_string())),
    }
  }
}

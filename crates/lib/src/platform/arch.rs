use std::fmt;
use std::str::FromStr;

use super::PlatformError;

/// CPU architectures the Go toolchain can be asked to target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Arch {
  Amd64,
  I386,
  Arm,
  Arm64,
  Ppc64le,
  S390x,
}

impl Arch {
  /// Returns the `GOARCH` identifier for this architecture
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Amd64 => "amd64",
      Self::I386 => "386",
      Self::Arm => "arm",
      Self::Arm64 => "arm64",
      Self::Ppc64le => "ppc64le",
      Self::S390x => "s390x",
    }
  }
}

impl fmt::Display for Arch {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for Arch {
  type Err = PlatformError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "amd64" => Ok(Self::Amd64),
      "386" => Ok(Self::I386),
      "arm" => Ok(Self::Arm),
      "arm64" => Ok(Self::Arm64),
      "ppc64le" => Ok(Self::Ppc64le),
      "s390x" => Ok(Self::S390x),
      other => Err(PlatformError::UnknownArch(other.to_string())),
    }
  }
}

//! Go release identifiers (`go1.4.2`, `go1.5beta1`, `devel +abc`).

use std::fmt;

use semver::{Prerelease, Version};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoVersion {
  Release(Version),
  /// Built from source; newer than any release we check against.
  Devel,
}

impl GoVersion {
  /// Parses the first line of `go version` output.
  pub fn from_version_output(output: &str) -> Option<Self> {
    let mut words = output.split_whitespace();
    if words.next()? != "go" || words.next()? != "version" {
      return None;
    }
    let tag = words.next()?;
    if tag == "devel" || tag.starts_with("devel") {
      return Some(Self::Devel);
    }
    parse_release(tag.strip_prefix("go")?).map(Self::Release)
  }

  /// Parses a configured minimum such as `1.4` or `go1.4.2`.
  pub fn parse_minimum(s: &str) -> Option<Version> {
    let s = s.trim();
    parse_release(s.strip_prefix("go").unwrap_or(s))
  }

  pub fn satisfies(&self, minimum: &Version) -> bool {
    match self {
      Self::Devel => true,
      Self::Release(version) => version >= minimum,
    }
  }
}

impl fmt::Display for GoVersion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Devel => write!(f, "devel"),
      Self::Release(v) if v.pre.is_empty() && v.patch == 0 => write!(f, "go{}.{}", v.major, v.minor),
      Self::Release(v) if v.pre.is_empty() => write!(f, "go{}.{}.{}", v.major, v.minor, v.patch),
      Self::Release(v) => write!(f, "go{}.{}.{}-{}", v.major, v.minor, v.patch, v.pre),
    }
  }
}

/// `1.4` -> 1.4.0, `1.5beta1` -> 1.5.0-beta1, `1.21rc2` -> 1.21.0-rc2
fn parse_release(s: &str) -> Option<Version> {
  let split = s.find(|c: char| !c.is_ascii_digit() && c != '.').unwrap_or(s.len());
  let (numeric, suffix) = s.split_at(split);

  let mut parts = numeric.split('.').map(|p| p.parse::<u64>());
  let major = parts.next()?.ok()?;
  let minor = parts.next().transpose().ok()?.unwrap_or(0);
  let patch = parts.next().transpose().ok()?.unwrap_or(0);
  if parts.next().is_some() {
    return None;
  }

  let mut version = Version::new(major, minor, patch);
  if !suffix.is_empty() {
    version.pre = Prerelease::new(suffix).ok()?;
  }
  Some(version)
}

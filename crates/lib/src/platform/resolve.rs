//! Platform resolution for a build invocation.
//!
//! Decides which platforms a build covers and brackets each platform's builds
//! with the matching `GOOS`/`GOARCH` in the toolchain environment.

use std::ops::Deref;

use tracing::debug;

use super::{Platform, PlatformError};
use crate::toolchain::env::{EnvValue, ToolchainEnv};
use crate::toolchain::{Toolchain, ToolchainError};

/// Queries the toolchain for the platform it considers native.
pub async fn host_platform<T: Toolchain>(
  toolchain: &T,
  env: &ToolchainEnv,
) -> Result<Platform, ToolchainError> {
  let os = toolchain.go_env("GOHOSTOS", env).await?;
  let arch = toolchain.go_env("GOHOSTARCH", env).await?;
  let platform = format!("{}/{}", os, arch);
  platform
    .parse()
    .map_err(|e: PlatformError| ToolchainError::UnexpectedOutput {
      query: "go env GOHOSTOS GOHOSTARCH".to_string(),
      output: format!("{platform} ({e})"),
    })
}

/// The host platform with any explicit OS/architecture override applied.
///
/// Each override replaces only its own component, so overriding just the
/// architecture keeps the host OS.
pub fn current_platform(
  host: Platform,
  goos: Option<&str>,
  goarch: Option<&str>,
) -> Result<Platform, PlatformError> {
  let mut platform = host;
  if let Some(os) = goos.filter(|s| !s.is_empty()) {
    platform.os = os.parse()?;
  }
  if let Some(arch) = goarch.filter(|s| !s.is_empty()) {
    platform.arch = arch.parse()?;
  }
  Ok(platform)
}

/// Platforms to build for: the request as given, or the host when empty.
pub fn resolve_platforms(requested: &[Platform], host: Platform) -> Vec<Platform> {
  if requested.is_empty() {
    vec![host]
  } else {
    requested.to_vec()
  }
}

/// Sets `GOOS`/`GOARCH` for the lifetime of the guard.
///
/// Dropping the guard puts both variables back exactly as they were before
/// acquisition, whether the bracketed builds succeeded or not.
pub struct PlatformScope<'a> {
  env: &'a mut ToolchainEnv,
  platform: Platform,
  prev_os: Option<EnvValue>,
  prev_arch: Option<EnvValue>,
}

impl<'a> PlatformScope<'a> {
  pub fn acquire(env: &'a mut ToolchainEnv, platform: Platform) -> Self {
    let prev_os = env.state("GOOS").cloned();
    let prev_arch = env.state("GOARCH").cloned();
    env.set("GOOS", platform.os.as_str());
    env.set("GOARCH", platform.arch.as_str());
    debug!(platform = %platform, "platform environment applied");
    Self {
      env,
      platform,
      prev_os,
      prev_arch,
    }
  }

  pub fn platform(&self) -> Platform {
    self.platform
  }
}

impl Deref for PlatformScope<'_> {
  type Target = ToolchainEnv;

  fn deref(&self) -> &Self::Target {
    self.env
  }
}

impl Drop for PlatformScope<'_> {
  fn drop(&mut self) {
    self.env.restore("GOOS", self.prev_os.take());
    self.env.restore("GOARCH", self.prev_arch.take());
    debug!(platform = %self.platform, "platform environment released");
  }
}

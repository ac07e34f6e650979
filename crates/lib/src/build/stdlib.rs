//! Prebuilt standard library check for static builds.

use std::path::Path;

use tracing::debug;

use super::types::BuildError;
use crate::consts::STATIC_INSTALL_SUFFIX;
use crate::platform::Platform;
use crate::util::fs::is_writable;

/// Refuses a static build when the platform's cgo-free standard library is
/// missing and `go` could not create it without elevated rights.
///
/// When `<GOROOT>/pkg` is writable the toolchain builds what it needs on its
/// own, so the check passes.
pub fn exit_if_stdlib_not_installed(goroot: &Path, platform: Platform) -> Result<(), BuildError> {
  let pkg_dir = goroot.join("pkg");
  let expected = pkg_dir.join(format!("{}_{}", platform.dir_name(), STATIC_INSTALL_SUFFIX));

  if expected.is_dir() {
    return Ok(());
  }
  if is_writable(&pkg_dir) {
    debug!(path = %expected.display(), "static stdlib missing; toolchain will build it");
    return Ok(());
  }

  Err(BuildError::StdlibPrebuiltMissing {
    platform,
    fix: format!(
      "sudo GOOS={} GOARCH={} CGO_ENABLED=0 go install -installsuffix {} std",
      platform.os, platform.arch, STATIC_INSTALL_SUFFIX
    ),
    expected,
    pkg_dir,
  })
}

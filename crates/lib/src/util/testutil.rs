//! Test utilities for gomatrix-lib.
//!
//! [`FakeToolchain`] stands in for `go`: it answers `go env`/`go version`
//! queries, writes placeholder binaries for `go build`/`go install`, and
//! records every invocation for later inspection.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::platform::Platform;
use crate::toolchain::{Toolchain, ToolchainEnv, ToolchainError};

/// One recorded toolchain invocation.
#[derive(Debug, Clone)]
pub struct Call {
  pub args: Vec<String>,
  pub env: ToolchainEnv,
  pub cwd: Option<PathBuf>,
}

impl Call {
  pub fn subcommand(&self) -> &str {
    self.args.first().map(String::as_str).unwrap_or("")
  }

  /// Package argument (always last for build/install).
  pub fn package(&self) -> &str {
    self.args.last().map(String::as_str).unwrap_or("")
  }

  pub fn has_arg_pair(&self, flag: &str, value: &str) -> bool {
    self.args.windows(2).any(|w| w[0] == flag && w[1] == value)
  }

  pub fn flag_value(&self, flag: &str) -> Option<&str> {
    self
      .args
      .windows(2)
      .find(|w| w[0] == flag)
      .map(|w| w[1].as_str())
  }

  pub fn platform(&self, host: Platform) -> Platform {
    match (self.env.get_str("GOOS"), self.env.get_str("GOARCH")) {
      (Some(os), Some(arch)) => Platform::new(os.parse().unwrap(), arch.parse().unwrap()),
      _ => host,
    }
  }

  pub fn cgo_disabled(&self) -> bool {
    self.env.get_str("CGO_ENABLED") == Some("0")
  }
}

pub struct FakeToolchain {
  pub host: Platform,
  pub version: String,
  pub goroot: PathBuf,
  pub missing: bool,
  failing: BTreeSet<(String, Platform)>,
  calls: Mutex<Vec<Call>>,
}

impl FakeToolchain {
  pub fn new(host: Platform) -> Self {
    Self {
      host,
      version: "go1.4.2".to_string(),
      goroot: PathBuf::new(),
      missing: false,
      failing: BTreeSet::new(),
      calls: Mutex::new(Vec::new()),
    }
  }

  pub fn with_version(mut self, version: &str) -> Self {
    self.version = version.to_string();
    self
  }

  pub fn with_goroot(mut self, goroot: &Path) -> Self {
    self.goroot = goroot.to_path_buf();
    self
  }

  pub fn missing(mut self) -> Self {
    self.missing = true;
    self
  }

  /// Make builds of packages ending in `target` fail for `platform`.
  pub fn fail(mut self, target: &str, platform: Platform) -> Self {
    self.failing.insert((target.to_string(), platform));
    self
  }

  pub fn calls(&self) -> Vec<Call> {
    self.calls.lock().unwrap().clone()
  }

  /// Only the `go build`/`go install` invocations.
  pub fn builds(&self) -> Vec<Call> {
    self
      .calls()
      .into_iter()
      .filter(|c| matches!(c.subcommand(), "build" | "install"))
      .collect()
  }

  fn write_binary(path: &Path) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, b"\x7fELF fake binary").unwrap();
  }
}

impl Toolchain for FakeToolchain {
  fn locate(&self) -> Result<PathBuf, ToolchainError> {
    if self.missing {
      return Err(ToolchainError::NotFound {
        program: "go".to_string(),
      });
    }
    Ok(PathBuf::from("/usr/local/go/bin/go"))
  }

  async fn run(
    &self,
    args: &[String],
    env: &ToolchainEnv,
    cwd: Option<&Path>,
  ) -> Result<String, ToolchainError> {
    let call = Call {
      args: args.to_vec(),
      env: env.clone(),
      cwd: cwd.map(Path::to_path_buf),
    };
    self.calls.lock().unwrap().push(call.clone());

    let platform = call.platform(self.host);
    let failed = |args: &[String]| ToolchainError::CmdFailed {
      args: args.to_vec(),
      code: Some(2),
      stderr: "compile error".to_string(),
    };

    match call.subcommand() {
      "version" => Ok(format!("go version {} {}", self.version, self.host)),
      "env" => match args.get(1).map(String::as_str) {
        Some("GOHOSTOS") => Ok(self.host.os.to_string()),
        Some("GOHOSTARCH") => Ok(self.host.arch.to_string()),
        Some("GOROOT") => Ok(self.goroot.display().to_string()),
        _ => Ok(String::new()),
      },
      "build" => {
        let out = PathBuf::from(call.flag_value("-o").unwrap());
        let fails = self
          .failing
          .iter()
          .any(|(t, p)| call.package().ends_with(t.as_str()) && *p == platform);
        // a failing compile may still leave a truncated output behind
        Self::write_binary(&out);
        if fails {
          return Err(failed(args));
        }
        Ok(String::new())
      }
      "install" => {
        let fails = self
          .failing
          .iter()
          .any(|(t, p)| call.package().ends_with(t.as_str()) && *p == platform);
        if fails {
          return Err(failed(args));
        }
        let gopath = env.get("GOPATH").unwrap();
        let first = std::env::split_paths(gopath).next().unwrap();
        let mut dir = first.join("bin");
        if platform != self.host {
          dir = dir.join(platform.dir_name());
        }
        let name = call.package().rsplit('/').next().unwrap();
        Self::write_binary(&dir.join(platform.exe_name(name)));
        Ok(String::new())
      }
      _ => Ok(String::new()),
    }
  }
}

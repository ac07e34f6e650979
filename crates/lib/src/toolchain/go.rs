//! Go toolchain invocation.

use std::path::{Path, PathBuf};

use tokio::process::Command;
use tracing::{debug, info};

use super::{Toolchain, ToolchainEnv, ToolchainError};

/// The `go` executable, found on `PATH` or at an explicit location.
#[derive(Debug, Clone)]
pub struct GoToolchain {
  program: PathBuf,
}

impl Default for GoToolchain {
  fn default() -> Self {
    Self {
      program: PathBuf::from("go"),
    }
  }
}

impl GoToolchain {
  pub fn new(program: impl Into<PathBuf>) -> Self {
    Self {
      program: program.into(),
    }
  }

  pub fn program(&self) -> &Path {
    &self.program
  }
}

impl Toolchain for GoToolchain {
  fn locate(&self) -> Result<PathBuf, ToolchainError> {
    which::which(&self.program).map_err(|_| ToolchainError::NotFound {
      program: self.program.display().to_string(),
    })
  }

  async fn run(
    &self,
    args: &[String],
    env: &ToolchainEnv,
    cwd: Option<&Path>,
  ) -> Result<String, ToolchainError> {
    info!(args = %args.join(" "), "invoking go");

    let mut command = Command::new(&self.program);
    command.args(args);
    env.apply(&mut command);
    if let Some(dir) = cwd {
      command.current_dir(dir);
    }

    debug!(program = %self.program.display(), cwd = ?cwd, "spawning process");

    let output = command.output().await.map_err(|source| ToolchainError::Spawn {
      program: self.program.display().to_string(),
      source,
    })?;

    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

    if !output.status.success() {
      if !stderr.is_empty() {
        debug!(stderr = %stderr, "go stderr");
      }
      if !stdout.is_empty() {
        debug!(stdout = %stdout, "go stdout");
      }
      return Err(ToolchainError::CmdFailed {
        args: args.to_vec(),
        code: output.status.code(),
        stderr,
      });
    }

    if !stdout.is_empty() {
      debug!(stdout = %stdout, "go output");
    }

    Ok(stdout)
  }
}

//! The compiler toolchain seam.
//!
//! Everything the orchestrator needs from `go` goes through [`Toolchain`]:
//! locating the executable, querying `go env`/`go version`, and running
//! `go build`/`go install`. [`GoToolchain`] is the real implementation.

pub mod env;
pub mod go;
pub mod go_version;

use std::path::{Path, PathBuf};

use thiserror::Error;

pub use env::ToolchainEnv;
pub use go::GoToolchain;
pub use go_version::GoVersion;

/// Errors from invoking the toolchain.
#[derive(Debug, Error)]
pub enum ToolchainError {
  /// The executable could not be found.
  #[error("toolchain executable '{program}' not found")]
  NotFound { program: String },

  /// The process could not be started.
  #[error("failed to spawn {program}: {source}")]
  Spawn {
    program: String,
    #[source]
    source: std::io::Error,
  },

  /// The process ran and exited unsuccessfully.
  #[error(
    "`go {}` exited with {}: {stderr}",
    args.join(" "),
    code.map_or_else(|| "a signal".to_string(), |c| format!("status {c}"))
  )]
  CmdFailed {
    args: Vec<String>,
    code: Option<i32>,
    stderr: String,
  },

  /// A query returned something we could not interpret.
  #[error("unexpected output from `{query}`: {output}")]
  UnexpectedOutput { query: String, output: String },
}

/// A compiler toolchain that can be queried and invoked.
///
/// Invocations run one at a time; implementations need not be `Sync`.
#[allow(async_fn_in_trait)]
pub trait Toolchain {
  /// Resolves the executable, failing if it is not installed.
  fn locate(&self) -> Result<PathBuf, ToolchainError>;

  /// Runs the toolchain with `args` and returns its trimmed stdout.
  async fn run(
    &self,
    args: &[String],
    env: &ToolchainEnv,
    cwd: Option<&Path>,
  ) -> Result<String, ToolchainError>;

  /// `go env <var>`
  async fn go_env(&self, var: &str, env: &ToolchainEnv) -> Result<String, ToolchainError> {
    self
      .run(&["env".to_string(), var.to_string()], env, None)
      .await
  }

  /// `go version`, parsed.
  async fn version(&self, env: &ToolchainEnv) -> Result<GoVersion, ToolchainError> {
    let output = self.run(&["version".to_string()], env, None).await?;
    GoVersion::from_version_output(&output).ok_or(ToolchainError::UnexpectedOutput {
      query: "go version".to_string(),
      output,
    })
  }
}

//! Version stamp embedded into every binary via `-ldflags -X`.
//!
//! Computed once per invocation so every target and platform in a build
//! carries the same stamp.

use std::path::Path;
use std::time::SystemTime;

use tokio::process::Command;
use tracing::debug;

use crate::config::EnvOverrides;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionInfo {
  pub git_version: Option<String>,
  pub git_commit: Option<String>,
  pub git_tree_state: Option<String>,
  /// RFC 3339, UTC, second precision.
  pub build_date: String,
}

impl VersionInfo {
  /// Fills in whatever the environment does not provide from `git`.
  pub async fn detect(source_root: &Path, overrides: &EnvOverrides) -> Self {
    let git_commit = match &overrides.git_commit {
      Some(commit) => Some(commit.clone()),
      None => git(source_root, &["rev-parse", "HEAD^{commit}"]).await,
    };

    let git_tree_state = match &overrides.git_tree_state {
      Some(state) => Some(state.clone()),
      None if git_commit.is_some() => git_status_porcelain(source_root)
        .await
        .map(|dirty| if dirty { "dirty" } else { "clean" }.to_string()),
      None => None,
    };

    let git_version = match &overrides.git_version {
      Some(version) => Some(version.clone()),
      None => git(source_root, &["describe", "--tags", "--abbrev=14", "HEAD^{commit}"])
        .await
        .map(|v| {
          if git_tree_state.as_deref() == Some("dirty") {
            format!("{v}-dirty")
          } else {
            v
          }
        }),
    };

    Self {
      git_version,
      git_commit,
      git_tree_state,
      build_date: humantime::format_rfc3339_seconds(SystemTime::now()).to_string(),
    }
  }

  /// `-X` assignments for `<package>/pkg/version`, space separated.
  ///
  /// Values that could not be determined are left out so the binary keeps
  /// its compiled-in default.
  pub fn ldflags(&self, package: &str) -> String {
    let key = |name: &str| format!("{package}/pkg/version.{name}");
    let mut flags = Vec::new();
    let mut add = |name: &str, value: Option<&str>| {
      if let Some(value) = value {
        flags.push(format!("-X {}={}", key(name), value));
      }
    };
    add("gitVersion", self.git_version.as_deref());
    add("gitCommit", self.git_commit.as_deref());
    add("gitTreeState", self.git_tree_state.as_deref());
    add("buildDate", Some(&self.build_date));
    flags.join(" ")
  }
}

async fn git(dir: &Path, args: &[&str]) -> Option<String> {
  let output = Command::new("git")
    .arg("-C")
    .arg(dir)
    .args(args)
    .output()
    .await
    .ok()?;
  if !output.status.success() {
    debug!(args = ?args, "git query failed");
    return None;
  }
  let out = String::from_utf8_lossy(&output.stdout).trim().to_string();
  (!out.is_empty()).then_some(out)
}

async fn git_status_porcelain(dir: &Path) -> Option<bool> {
  let output = Command::new("git")
    .arg("-C")
    .arg(dir)
    .args(["status", "--porcelain"])
    .output()
    .await
    .ok()?;
  output
    .status
    .success()
    .then(|| !output.stdout.iter().all(u8::is_ascii_whitespace))
}

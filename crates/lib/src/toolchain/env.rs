//! Environment handed to every toolchain invocation.
//!
//! The orchestrator never mutates its own process environment. Everything the
//! toolchain should see (`GOPATH`, `GOOS`, `GOARCH`, `CGO_ENABLED`, a cleared
//! `GOBIN`) is recorded here and applied to each spawned command.

use std::collections::BTreeMap;
use std::ffi::OsString;

use tokio::process::Command;

/// State of a single variable relative to the inherited environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvValue {
  /// Set to the given value for the child.
  Set(OsString),
  /// Removed from the child even if the parent has it.
  Removed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolchainEnv {
  vars: BTreeMap<String, EnvValue>,
}

impl ToolchainEnv {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn set(&mut self, key: impl Into<String>, value: impl Into<OsString>) {
    self.vars.insert(key.into(), EnvValue::Set(value.into()));
  }

  /// Hide `key` from the child process.
  pub fn remove(&mut self, key: impl Into<String>) {
    self.vars.insert(key.into(), EnvValue::Removed);
  }

  /// Current override for `key`; `None` means the child inherits it.
  pub fn state(&self, key: &str) -> Option<&EnvValue> {
    self.vars.get(key)
  }

  /// Put `key` back into a previously captured state.
  pub fn restore(&mut self, key: &str, state: Option<EnvValue>) {
    match state {
      Some(value) => {
        self.vars.insert(key.to_string(), value);
      }
      None => {
        self.vars.remove(key);
      }
    }
  }

  /// Value of `key` when explicitly set.
  pub fn get(&self, key: &str) -> Option<&OsString> {
    match self.vars.get(key) {
      Some(EnvValue::Set(value)) => Some(value),
      _ => None,
    }
  }

  pub fn get_str(&self, key: &str) -> Option<&str> {
    self.get(key).and_then(|v| v.to_str())
  }

  /// Returns a copy with `key` set, leaving `self` untouched.
  pub fn with(&self, key: impl Into<String>, value: impl Into<OsString>) -> Self {
    let mut env = self.clone();
    env.set(key, value);
    env
  }

  pub fn apply(&self, command: &mut Command) {
    for (key, value) in &self.vars {
      match value {
        EnvValue::Set(v) => {
          command.env(key, v);
        }
        EnvValue::Removed => {
          command.env_remove(key);
        }
      }
    }
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &EnvValue)> {
    self.vars.iter().map(|(k, v)| (k.as_str(), v))
  }
}

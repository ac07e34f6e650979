//! Inventory of buildable targets.
//!
//! Targets are identified by their path relative to the repository root
//! (`cmd/apiserver`). Each one belongs to a category and carries its
//! [`BuildMode`], decided once from the static-link allow-list when the
//! target is created.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
  Server,
  Client,
  Test,
}

impl Category {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Server => "server",
      Self::Client => "client",
      Self::Test => "test",
    }
  }
}

impl fmt::Display for Category {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
  /// Built with `CGO_ENABLED=0` and a distinguishing install suffix.
  Static,
  Dynamic,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Target {
  path: String,
  name: String,
  category: Category,
  mode: BuildMode,
}

impl Target {
  pub fn new(path: &str, category: Category, static_names: &BTreeSet<String>) -> Self {
    let path = path.trim_matches('/').to_string();
    let name = short_name(&path).to_string();
    let mode = if static_names.contains(&name) {
      BuildMode::Static
    } else {
      BuildMode::Dynamic
    };
    Self {
      path,
      name,
      category,
      mode,
    }
  }

  pub fn path(&self) -> &str {
    &self.path
  }

  /// Final path component; also the binary name.
  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn category(&self) -> Category {
    self.category
  }

  pub fn mode(&self) -> BuildMode {
    self.mode
  }
}

impl fmt::Display for Target {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.path)
  }
}

fn short_name(path: &str) -> &str {
  path.rsplit('/').next().unwrap_or(path)
}

#[derive(Debug, Clone)]
pub struct Registry {
  server: Vec<Target>,
  client: Vec<Target>,
  test: Vec<Target>,
  static_names: BTreeSet<String>,
}

impl Default for Registry {
  fn default() -> Self {
    Self::from_config(&Config::default())
  }
}

impl Registry {
  pub fn new<S: AsRef<str>>(server: &[S], client: &[S], test: &[S], static_names: &[S]) -> Self {
    let static_names: BTreeSet<String> = static_names.iter().map(|s| s.as_ref().to_string()).collect();
    let build = |paths: &[S], category: Category| -> Vec<Target> {
      paths
        .iter()
        .map(|p| Target::new(p.as_ref(), category, &static_names))
        .collect()
    };
    let server = build(server, Category::Server);
    let client = build(client, Category::Client);
    let test = build(test, Category::Test);
    Self {
      server,
      client,
      test,
      static_names,
    }
  }

  pub fn from_config(config: &Config) -> Self {
    let t = &config.targets;
    Self::new(&t.server, &t.client, &t.test, &t.static_linked)
  }

  pub fn server_targets(&self) -> &[Target] {
    &self.server
  }

  pub fn client_targets(&self) -> &[Target] {
    &self.client
  }

  pub fn test_targets(&self) -> &[Target] {
    &self.test
  }

  pub fn targets(&self, category: Category) -> &[Target] {
    match category {
      Category::Server => &self.server,
      Category::Client => &self.client,
      Category::Test => &self.test,
    }
  }

  /// Server, client and test targets in that order, each path once.
  pub fn all_targets(&self) -> Vec<Target> {
    let mut seen = BTreeSet::new();
    self
      .server
      .iter()
      .chain(&self.client)
      .chain(&self.test)
      .filter(|t| seen.insert(t.path.clone()))
      .cloned()
      .collect()
  }

  pub fn server_binaries(&self) -> Vec<&str> {
    self.server.iter().map(Target::name).collect()
  }

  pub fn client_binaries(&self) -> Vec<&str> {
    self.client.iter().map(Target::name).collect()
  }

  pub fn test_binaries(&self) -> Vec<&str> {
    self.test.iter().map(Target::name).collect()
  }

  pub fn all_binaries(&self) -> Vec<String> {
    self.all_targets().iter().map(|t| t.name.clone()).collect()
  }

  pub fn is_statically_linked(&self, target: &Target) -> bool {
    target.mode == BuildMode::Static
  }

  /// Looks a target up by path or short name.
  pub fn find(&self, id: &str) -> Option<&Target> {
    let id = id.trim_matches('/');
    self
      .server
      .iter()
      .chain(&self.client)
      .chain(&self.test)
      .find(|t| t.path == id || t.name == id)
  }

  /// Maps command-line identifiers onto targets.
  ///
  /// Unknown identifiers become ad-hoc client targets; they still get the
  /// static build mode when their short name is on the allow-list.
  pub fn resolve(&self, ids: &[String]) -> Vec<Target> {
    ids
      .iter()
      .map(|id| match self.find(id) {
        Some(t) => t.clone(),
        None => Target::new(id, Category::Client, &self.static_names),
      })
      .collect()
  }
}

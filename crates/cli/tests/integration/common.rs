//! Shared test helpers for CLI integration tests.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Stand-in for the go toolchain. Reports a linux/amd64 host, answers
/// `version` and `env`, and writes the platform into every binary it "builds".
const FAKE_GO: &str = r#"#!/bin/sh
case "$1" in
  version)
    echo "go version ${FAKE_GO_VERSION:-go1.4.2} linux/amd64"
    ;;
  env)
    case "$2" in
      GOHOSTOS) echo linux ;;
      GOHOSTARCH) echo amd64 ;;
      GOROOT) echo "$FAKE_GOROOT" ;;
    esac
    ;;
  build|install)
    mode="$1"
    shift
    out=""
    pkg=""
    while [ $# -gt 0 ]; do
      case "$1" in
        -o) out="$2"; shift 2 ;;
        *) pkg="$1"; shift ;;
      esac
    done
    name="${pkg##*/}"
    if [ -n "$FAKE_GO_FAIL" ] && [ "$name" = "$FAKE_GO_FAIL" ]; then
      echo "$pkg: compile error" >&2
      exit 1
    fi
    if [ "$mode" = install ]; then
      dir="${GOPATH%%:*}/bin"
      if [ "$GOOS/$GOARCH" != "linux/amd64" ]; then
        dir="$dir/${GOOS}_${GOARCH}"
      fi
      suffix=""
      if [ "$GOOS" = windows ]; then
        suffix=".exe"
      fi
      mkdir -p "$dir"
      out="$dir/$name$suffix"
    fi
    echo "$GOOS/$GOARCH" > "$out"
    ;;
  *)
    echo "unsupported: $*" >&2
    exit 2
    ;;
esac
"#;

/// Environment variables that would leak the caller's setup into a test.
const INHERITED: &[&str] = &[
  "CI",
  "TRAVIS",
  "GOMATRIX_GOOS",
  "GOMATRIX_GOARCH",
  "GOMATRIX_EXTRA_GOPATH",
  "GOMATRIX_NO_GODEPS",
  "GOMATRIX_BUILD_PLATFORMS",
  "GOMATRIX_GOFLAGS",
  "GOMATRIX_OUTPUT",
  "GOMATRIX_GO",
  "RUST_LOG",
];

/// Isolated test environment.
///
/// Each test gets its own temporary directory holding a source tree, an
/// output directory, a fake GOROOT and a fake `go`.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  pub fn new() -> Self {
    let temp = TempDir::new().unwrap();
    let env = Self { temp };
    std::fs::create_dir_all(env.source_path().join("cmd/ctl")).unwrap();
    std::fs::create_dir_all(env.goroot_path().join("pkg")).unwrap();
    env.write_file("bin/go", FAKE_GO);
    make_executable(&env.go_path());
    env
  }

  /// Marks the prebuilt static standard library as installed for `os_arch`.
  pub fn with_static_stdlib(self, os_arch: &str) -> Self {
    std::fs::create_dir_all(self.goroot_path().join("pkg").join(format!("{}_cgo", os_arch))).unwrap();
    self
  }

  /// Write a file relative to the temp directory.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.temp.path().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  pub fn root(&self) -> PathBuf {
    dunce::canonicalize(self.temp.path()).unwrap()
  }

  pub fn source_path(&self) -> PathBuf {
    self.root().join("src")
  }

  pub fn output_path(&self) -> PathBuf {
    self.root().join("out")
  }

  pub fn goroot_path(&self) -> PathBuf {
    self.root().join("goroot")
  }

  pub fn go_path(&self) -> PathBuf {
    self.root().join("bin/go")
  }

  /// `<output>/go/bin`, where unplaced binaries land.
  pub fn gopath_bin(&self) -> PathBuf {
    self.output_path().join("go/bin")
  }

  /// Get a pre-configured Command for the gomatrix binary.
  ///
  /// Runs inside the temp directory with the fake toolchain, a fixed
  /// version stamp and nothing inherited from the caller's environment.
  pub fn gomatrix_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("gomatrix");
    for var in INHERITED {
      cmd.env_remove(var);
    }
    cmd.current_dir(self.root());
    cmd.env("GOMATRIX_GO", self.go_path());
    cmd.env("GOMATRIX_NO_GODEPS", "1");
    cmd.env("GOMATRIX_GIT_VERSION", "v1.2.3");
    cmd.env("GOMATRIX_GIT_COMMIT", "0123456789abcdef");
    cmd.env("GOMATRIX_GIT_TREE_STATE", "clean");
    cmd.env("FAKE_GOROOT", self.goroot_path());
    cmd.arg("--source").arg(self.source_path());
    cmd.arg("--out-dir").arg(self.output_path());
    cmd
  }
}

fn make_executable(path: &Path) {
  use std::os::unix::fs::PermissionsExt;
  let mut perms = std::fs::metadata(path).unwrap().permissions();
  perms.set_mode(0o755);
  std::fs::set_permissions(path, perms).unwrap();
}

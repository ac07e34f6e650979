//! Build command integration tests.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn build_host_and_cross_platforms_then_place() {
  let env = TestEnv::new();
  let placed = env.root().join("placed");

  env
    .gomatrix_cmd()
    .args(["build", "--platform", "linux/amd64", "--platform", "windows/amd64", "--place"])
    .arg(&placed)
    .arg("ctl")
    .assert()
    .success()
    .stdout(predicate::str::contains("Succeeded: 2"));

  assert!(env.gopath_bin().join("ctl").is_file());
  assert!(env.gopath_bin().join("windows_amd64/ctl.exe").is_file());

  let linux = std::fs::read_to_string(placed.join("linux/amd64/ctl")).unwrap();
  assert_eq!(linux.trim(), "linux/amd64");
  let windows = std::fs::read_to_string(placed.join("windows/amd64/ctl.exe")).unwrap();
  assert_eq!(windows.trim(), "windows/amd64");
  // client platforms that were not built are skipped
  assert!(!placed.join("darwin").exists());
}

#[test]
fn build_platforms_come_from_environment() {
  let env = TestEnv::new();

  env
    .gomatrix_cmd()
    .env("GOMATRIX_BUILD_PLATFORMS", "linux/arm darwin/amd64")
    .args(["build", "cmd/ctl"])
    .assert()
    .success();

  assert!(env.gopath_bin().join("linux_arm/ctl").is_file());
  assert!(env.gopath_bin().join("darwin_amd64/ctl").is_file());
  assert!(!env.gopath_bin().join("ctl").exists());
}

#[test]
fn build_failure_isolated_and_reported() {
  let env = TestEnv::new().with_static_stdlib("linux_amd64");

  env
    .gomatrix_cmd()
    .env("FAKE_GO_FAIL", "ctl")
    .args(["build", "ctl", "apiserver"])
    .assert()
    .code(1)
    .stdout(predicate::str::contains("Failed: 1"))
    .stderr(predicate::str::contains("cmd/ctl"));

  assert!(env.gopath_bin().join("apiserver").is_file());
  assert!(!env.gopath_bin().join("ctl").exists());
}

#[test]
fn static_target_without_prebuilt_stdlib_fails() {
  let env = TestEnv::new();

  // a GOROOT without pkg/ can neither hold nor receive the static stdlib
  env
    .gomatrix_cmd()
    .env("FAKE_GOROOT", env.root().join("no-goroot"))
    .args(["build", "apiserver", "ctl"])
    .assert()
    .code(1)
    .stderr(predicate::str::contains("-installsuffix cgo std"));

  assert!(env.gopath_bin().join("ctl").is_file());
  assert!(!env.gopath_bin().join("apiserver").exists());
}

#[test]
fn install_mode_uses_toolchain_layout() {
  let env = TestEnv::new();

  env
    .gomatrix_cmd()
    .args(["build", "--install", "--platform", "darwin/amd64", "ctl"])
    .assert()
    .success();

  assert!(env.gopath_bin().join("darwin_amd64/ctl").is_file());
}

#[test]
fn build_json_output() {
  let env = TestEnv::new();

  let output = env
    .gomatrix_cmd()
    .args(["build", "-o", "json", "ctl", "-race"])
    .output()
    .unwrap();
  assert!(output.status.success());

  let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(json["success"], true);
  assert_eq!(json["mode"], "build");
  assert_eq!(json["platforms"][0], "linux/amd64");
  assert_eq!(json["results"][0]["target"], "cmd/ctl");
  assert!(json["results"][0]["error"].is_null());
}

#[test]
fn old_toolchain_exits_with_code_2() {
  let env = TestEnv::new();

  env
    .gomatrix_cmd()
    .env("FAKE_GO_VERSION", "go1.3.3")
    .args(["build", "ctl"])
    .assert()
    .code(2)
    .stderr(predicate::str::contains("1.4.0 or greater"));

  assert!(!env.gopath_bin().exists());
}

#[test]
fn old_toolchain_accepted_in_ci() {
  let env = TestEnv::new();

  env
    .gomatrix_cmd()
    .env("FAKE_GO_VERSION", "go1.3.3")
    .env("CI", "true")
    .args(["build", "ctl"])
    .assert()
    .success();
}

#[test]
fn missing_toolchain_exits_with_code_2() {
  let env = TestEnv::new();

  env
    .gomatrix_cmd()
    .env("GOMATRIX_GO", env.root().join("no-such-go"))
    .args(["build", "ctl"])
    .assert()
    .code(2)
    .stderr(predicate::str::contains("cannot find the go toolchain"));
}

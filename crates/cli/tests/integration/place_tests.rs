//! Place command integration tests.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn place_without_builds_creates_nothing() {
  let env = TestEnv::new();
  let dest = env.root().join("placed");

  env
    .gomatrix_cmd()
    .arg("place")
    .arg(&dest)
    .args(["--platform", "darwin/amd64"])
    .assert()
    .success()
    .stdout(predicate::str::contains("darwin/amd64: not built"));

  assert!(!dest.join("darwin").exists());
}

#[test]
fn place_defaults_to_output_bin() {
  let env = TestEnv::new();
  env.write_file("out/go/bin/ctl", "host");
  env.write_file("out/go/bin/linux_arm/ctl", "arm");

  env.gomatrix_cmd().arg("place").assert().success();

  let bin = env.output_path().join("bin");
  assert_eq!(std::fs::read_to_string(bin.join("linux/amd64/ctl")).unwrap(), "host");
  assert_eq!(std::fs::read_to_string(bin.join("linux/arm/ctl")).unwrap(), "arm");
  assert!(!bin.join("windows").exists());
}

#[test]
fn place_json_lists_skipped_platforms() {
  let env = TestEnv::new();
  env.write_file("out/go/bin/ctl", "host");

  let output = env
    .gomatrix_cmd()
    .args(["place", "-o", "json", "--platform", "linux/amd64", "--platform", "linux/386"])
    .output()
    .unwrap();
  assert!(output.status.success());

  let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(json["placed"][0]["platform"], "linux/amd64");
  assert_eq!(json["placed"][0]["files"], 1);
  assert_eq!(json["skipped"][0], "linux/386");
}

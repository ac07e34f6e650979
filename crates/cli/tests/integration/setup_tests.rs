//! Setup and inventory command integration tests.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn setup_links_workspace_and_prints_gopath() {
  let env = TestEnv::new();

  env
    .gomatrix_cmd()
    .arg("setup")
    .assert()
    .success()
    .stdout(predicate::str::contains(env.output_path().join("go").display().to_string()));

  let root = env.output_path().join("go/src/example.com/monorepo");
  assert!(root.join("cmd/ctl").is_dir());
}

#[test]
fn setup_reads_config_file() {
  let env = TestEnv::new();
  env.write_file("gomatrix.toml", "package = \"github.com/acme/fleet\"\n");

  env.gomatrix_cmd().arg("setup").assert().success();

  assert!(env.output_path().join("go/src/github.com/acme/fleet/cmd/ctl").is_dir());
}

#[test]
fn invalid_config_fails() {
  let env = TestEnv::new();
  env.write_file("gomatrix.toml", "no_such_key = true\n");

  env
    .gomatrix_cmd()
    .arg("targets")
    .assert()
    .code(1)
    .stderr(predicate::str::contains("Failed to load config"));
}

#[test]
fn platforms_reports_current_override() {
  let env = TestEnv::new();

  env
    .gomatrix_cmd()
    .env("GOMATRIX_GOARCH", "arm")
    .arg("platforms")
    .assert()
    .success()
    .stdout(predicate::str::contains("Host: linux/amd64"))
    .stdout(predicate::str::contains("Current: linux/arm"));
}

#[test]
fn platforms_without_toolchain_still_lists_sets() {
  let env = TestEnv::new();

  env
    .gomatrix_cmd()
    .env("GOMATRIX_GO", env.root().join("no-such-go"))
    .arg("platforms")
    .assert()
    .success()
    .stdout(predicate::str::contains("windows/386"))
    .stderr(predicate::str::contains("Cannot determine host platform"));
}

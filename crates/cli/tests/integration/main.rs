//! CLI integration tests. They drive the real binary against a fake `go`
//! shell script, so they only run on unix.

#![cfg(unix)]

mod build_tests;
mod common;
mod place_tests;
mod setup_tests;

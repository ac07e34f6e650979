//! gomatrix-lib: multi-platform build orchestration for Go monorepos
//!
//! This crate provides the pieces of a build invocation:
//! - `registry`: the inventory of server, client and test targets
//! - `platform`: `os/arch` platforms and their resolution for a build
//! - `setup`: the linked workspace root, toolchain checks and `GOPATH`
//! - `build`: the target × platform build matrix
//! - `place`: copying binaries into `<bin>/<os>/<arch>/`

pub mod build;
pub mod config;
pub mod consts;
pub mod place;
pub mod platform;
pub mod registry;
pub mod setup;
pub mod toolchain;
pub mod util;
pub mod version;

//! Shared utilities.
//!
//! Filesystem helpers used by setup and placement, plus test helpers.

pub mod fs;

#[cfg(test)]
pub mod testutil;

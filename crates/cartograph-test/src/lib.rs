//! Regression tests for cartograph.
//!
//! `cli` drives the `cartograph` binary as a subprocess; `remote` serves
//! documents from a mock HTTP server to exercise URL loading.

#[cfg(test)]
mod cli;
#[cfg(test)]
mod remote;

use std::path::PathBuf;

/// Absolute path to the shared test fixtures directory.
pub fn fixtures() -> PathBuf {
    // CARGO_MANIFEST_DIR = .../crates/cartograph-test
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../tests/fixtures")
}

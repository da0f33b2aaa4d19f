//! Shared fixture for the CLI end-to-end tests.
//!
//! Note: Clippy cannot track usage across integration test files, hence
//! the `allow(dead_code)` annotation.
#![allow(dead_code)]

use assert_cmd::Command;
use std::path::Path;
use tempfile::TempDir;
use testmetry_testing::StoreFixture;

pub struct CliFixture {
    store: StoreFixture,
    home: TempDir,
}

impl CliFixture {
    /// A seeded store plus an isolated data directory, so config and
    /// default-source resolution never touch the real user dirs.
    pub fn seeded() -> Self {
        Self {
            store: StoreFixture::seeded(),
            home: TempDir::new().expect("temp home"),
        }
    }

    pub fn store_path(&self) -> &Path {
        self.store.path()
    }

    /// A command wired to the seeded store through `--source`.
    pub fn command(&self) -> Command {
        let mut cmd = self.bare_command();
        cmd.arg("--source").arg(self.store.path());
        cmd
    }

    /// A command with the isolated home only; source resolution is up
    /// to the test.
    pub fn bare_command(&self) -> Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("testmetry");
        cmd.env("TESTMETRY_HOME", self.home.path());
        cmd.env_remove("TESTMETRY_PATH");
        cmd
    }
}

//! End-to-end tests for source resolution and the config namespace.
//!
//! Every command runs with `TESTMETRY_HOME` pointed at a per-fixture
//! temp directory, so the resolution chain is exercised without ever
//! touching the real user config.

mod common;

use common::CliFixture;
use predicates::prelude::*;
use testmetry_testing::StoreFixture;

#[test]
fn config_init_then_queries_use_the_configured_source() {
    let fixture = CliFixture::seeded();

    fixture
        .bare_command()
        .args(["config", "init"])
        .arg(fixture.store_path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote "));

    fixture
        .bare_command()
        .args(["sessions", "count"])
        .assert()
        .success()
        .stdout("4\n");
}

#[test]
fn source_flag_wins_over_the_config_file() {
    let fixture = CliFixture::seeded();
    let empty = StoreFixture::empty();

    fixture
        .bare_command()
        .args(["config", "init"])
        .arg(empty.path())
        .assert()
        .success();

    // The configured source has no rows; the flag points at seeded data.
    fixture
        .command()
        .args(["sessions", "count"])
        .assert()
        .success()
        .stdout("4\n");

    fixture
        .bare_command()
        .args(["sessions", "count"])
        .assert()
        .success()
        .stdout("0\n");
}

#[test]
fn env_var_feeds_the_source_when_no_config_exists() {
    let fixture = CliFixture::seeded();

    fixture
        .bare_command()
        .env("TESTMETRY_PATH", fixture.store_path())
        .args(["sessions", "count"])
        .assert()
        .success()
        .stdout("4\n");
}

#[test]
fn config_file_wins_over_the_env_var() {
    let fixture = CliFixture::seeded();
    let empty = StoreFixture::empty();

    fixture
        .bare_command()
        .args(["config", "init"])
        .arg(fixture.store_path())
        .assert()
        .success();

    fixture
        .bare_command()
        .env("TESTMETRY_PATH", empty.path())
        .args(["sessions", "count"])
        .assert()
        .success()
        .stdout("4\n");
}

#[test]
fn config_show_reports_the_resolution_chain() {
    let fixture = CliFixture::seeded();

    fixture
        .bare_command()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("(absent)")
                .and(predicate::str::contains("configured source: (none)")),
        );

    fixture
        .bare_command()
        .args(["config", "init", "~/telemetry/nightly.db"])
        .assert()
        .success();

    fixture
        .bare_command()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("configured source: ~/telemetry/nightly.db")
                .and(predicate::str::contains("(absent)").not()),
        );
}

#[test]
fn missing_default_store_degrades_to_the_sentinel() {
    let fixture = CliFixture::seeded();

    // Nothing configured, no env var: resolution lands on the data-dir
    // default, which opens as a fresh store without tables.
    fixture
        .bare_command()
        .args(["sessions", "count"])
        .assert()
        .success()
        .stdout("-1\n")
        .stderr(predicate::str::contains("backend unavailable"));
}

#[test]
fn bare_invocation_prints_guidance() {
    let fixture = CliFixture::seeded();

    fixture
        .bare_command()
        .assert()
        .success()
        .stdout(predicate::str::contains("Quick commands"));
}

//! Integration tests for the `timeq` CLI binary.
//!
//! These use `assert_cmd` and `predicates` to exercise the point and range
//! subcommands through the actual binary, pinning the reference instant
//! with `--at` so every assertion is deterministic.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

/// Anchor used by every test: 2024-03-15T02:30:00Z = epoch 1710469800,
/// i.e. 10:30 in the fixed +8 local frame.
const AT: &str = "2024-03-15T02:30:00Z";

fn timeq() -> Command {
    Command::cargo_bin("timeq").unwrap()
}

#[test]
fn point_resolves_an_offset_expression() {
    timeq()
        .args(["point", "--at", AT, "--", "-1h"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"time_sec\": 1710466200"))
        .stdout(predicate::str::contains("\"error\": \"\""));
}

#[test]
fn point_resolves_a_setting_in_the_local_frame() {
    // Hour pinned to 0 at +8 is 16:00 UTC the previous day.
    timeq()
        .args(["point", "--at", AT, "0h"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"time_sec\": 1710432000"));
}

#[test]
fn range_of_empty_expressions_is_now_to_now() {
    timeq()
        .args(["range", "--at", AT])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"start_sec\": 1710469800"))
        .stdout(predicate::str::contains("\"end_sec\": 1710469800"));
}

#[test]
fn range_resolves_both_boundaries() {
    timeq()
        .args(["range", "--at", AT, "--start", "-2h", "--end", "-1h"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"start_sec\": 1710462600"))
        .stdout(predicate::str::contains("\"end_sec\": 1710466200"));
}

#[test]
fn inverted_range_is_forced_non_empty() {
    timeq()
        .args(["range", "--at", AT, "--end", "-1h"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"start_sec\": 1710469800"))
        .stdout(predicate::str::contains("\"end_sec\": 1710469801"));
}

#[test]
fn out_of_range_setting_reports_fallback_window() {
    timeq()
        .args(["point", "--at", AT, "99h"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"time_sec\": 1710469800"))
        .stdout(predicate::str::contains("\"start_sec\": 1710466200"))
        .stdout(predicate::str::contains("hour"));
}

#[test]
fn invalid_at_instant_is_a_cli_error() {
    timeq()
        .args(["point", "--at", "not-a-datetime", "-1h"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid --at instant"));
}

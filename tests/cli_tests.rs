//! CLI Integration Tests
//!
//! Drives the `splitstat` binary end to end: JSON output on success,
//! structured JSON errors and exit code 1 on rejected input.

use assert_cmd::Command;
use predicates::prelude::*;

fn splitstat() -> Command {
    Command::cargo_bin("splitstat").expect("binary builds")
}

#[test]
fn sample_size_happy_path() {
    splitstat()
        .args(["sample-size", "--baseline-rate", "0.03", "--mde", "0.005"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"sample_size_per_variant\""))
        .stdout(predicate::str::contains("\"methodology\": \"Two-proportion Z-test\""));
}

#[test]
fn sample_size_with_traffic_reports_duration() {
    splitstat()
        .args([
            "sample-size",
            "--baseline-rate",
            "0.03",
            "--mde",
            "0.005",
            "--daily-traffic",
            "5000",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"estimated_days\""))
        .stdout(predicate::str::contains("\"daily_traffic\": 5000"));
}

#[test]
fn sample_size_invalid_input_fails_with_all_violations() {
    splitstat()
        .args(["sample-size", "--baseline-rate", "1.5", "--mde", "-0.1"])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("INVALID_INPUT"))
        .stdout(predicate::str::contains("baseline_rate"))
        .stdout(predicate::str::contains("mde"));
}

#[test]
fn significance_happy_path() {
    splitstat()
        .args([
            "significance",
            "--control-visitors",
            "10000",
            "--control-conversions",
            "300",
            "--variant-visitors",
            "10000",
            "--variant-conversions",
            "350",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"significant\": true"))
        .stdout(predicate::str::contains("\"recommendation\""));
}

#[test]
fn significance_without_conversions_is_rejected() {
    splitstat()
        .args([
            "significance",
            "--control-visitors",
            "100",
            "--control-conversions",
            "0",
            "--variant-visitors",
            "100",
            "--variant-conversions",
            "0",
        ])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("INSUFFICIENT_DATA"));
}

//! CLI smoke tests — verify basic binary behavior.

use std::process::Command;

fn cli_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_neurosim"))
}

#[test]
fn test_help_flag() {
    let output = cli_bin().arg("--help").output().expect("failed to run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Usage"),
        "Expected usage info in --help output"
    );
}

#[test]
fn test_version_flag() {
    let output = cli_bin().arg("--version").output().expect("failed to run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("neurosim"),
        "Expected binary name in --version output"
    );
}

#[test]
fn test_batch_scenario_prints_response() {
    let output = cli_bin()
        .args(["--seed", "1", "hello there"])
        .output()
        .expect("failed to run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Okay."),
        "Expected a canned response, got: {stdout}"
    );
}

#[test]
fn test_batch_json_report_has_fixed_keys() {
    let output = cli_bin()
        .args(["--seed", "1", "--json", "--ticks", "3", "hello"])
        .output()
        .expect("failed to run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let report: serde_json::Value =
        serde_json::from_str(stdout.trim()).expect("output is not valid JSON");

    assert!(report["response"].is_string());
    assert!(report["microcircuit_state"]["excitation"].is_number());
    assert!(report["microcircuit_state"]["inhibition"].is_number());
    assert!(report["microcircuit_state"]["looping"].is_boolean());
}

#[test]
fn test_ptsd_threat_scenario() {
    let output = cli_bin()
        .args(["--ptsd", "--seed", "2", "danger explosion attack"])
        .output()
        .expect("failed to run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("I'm scared."),
        "Expected a fear response under PTSD, got: {stdout}"
    );
}

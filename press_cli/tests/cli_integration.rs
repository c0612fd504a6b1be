use assert_cmd::prelude::*;
use predicates::prelude::*;
use rstest::rstest;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;

// Minimal valid TOML config for sim mode, tuned for fast tests
fn write_valid_config(dir: &tempfile::TempDir) -> PathBuf {
    let toml = r#"
[pins]
# pins are unused in sim backend but must be present
range_trig = 23
range_echo = 24
thermo_so = 9
thermo_cs = 8
thermo_sck = 11
workpiece_ir = 17
hand_ir_adc = 0
pressure_adc = 1
heater_relay = 5
valve_relay = 6

[cycle]
period_ms = 1

[retraction]
baseline_gap_ms = 1
"#;
    let path = dir.path().join("cfg.toml");
    fs::write(&path, toml).unwrap();
    path
}

#[rstest]
#[case(&["--help"], "Usage:")]
#[case(&["run", "--help"], "--cycles")]
fn help_text(#[case] args: &[&str], #[case] needle: &str) {
    let mut cmd = Command::cargo_bin("press_cli").unwrap();
    cmd.args(args)
        .assert()
        .success()
        .stdout(predicate::str::contains(needle));
}

#[test]
fn missing_config_file_is_reported() {
    let mut cmd = Command::cargo_bin("press_cli").unwrap();
    cmd.arg("--config")
        .arg("/nonexistent/press.toml")
        .arg("self-check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("read config file"));
}

#[test]
fn inverted_heater_band_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cfg.toml");
    fs::write(
        &path,
        r#"
[pins]
range_trig = 23
range_echo = 24
thermo_so = 9
thermo_cs = 8
thermo_sck = 11
workpiece_ir = 17
hand_ir_adc = 0
pressure_adc = 1
heater_relay = 5
valve_relay = 6

[heater]
on_below_c = 185.0
off_at_c = 180.0
"#,
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("press_cli").unwrap();
    cmd.arg("--config")
        .arg(&path)
        .arg("self-check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("hysteresis"));
}

#[test]
fn bounded_run_emits_one_line_per_cycle() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);

    let mut cmd = Command::cargo_bin("press_cli").unwrap();
    let output = cmd
        .arg("--config")
        .arg(&cfg)
        .arg("run")
        .arg("--cycles")
        .arg("2")
        .assert()
        .success()
        .get_output()
        .clone();
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 2);
}

#[test]
fn self_check_passes_in_sim_mode() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);

    let mut cmd = Command::cargo_bin("press_cli").unwrap();
    cmd.arg("--config")
        .arg(&cfg)
        .arg("self-check")
        .assert()
        .success()
        .stdout(predicate::str::contains("self-check: ok"));
}

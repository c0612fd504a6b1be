use press_config::load_toml;
use rstest::rstest;

const PINS: &str = r#"
[pins]
range_trig = 9
range_echo = 10
thermo_so = 12
thermo_cs = 11
thermo_sck = 13
workpiece_ir = 8
hand_ir_adc = 0
pressure_adc = 4
heater_relay = 7
valve_relay = 4
"#;

#[test]
fn defaults_match_the_reference_deployment() {
    let cfg = load_toml(PINS).expect("parse TOML");
    cfg.validate().expect("default config should pass");

    assert_eq!(cfg.heater.on_below_c, 180.0);
    assert_eq!(cfg.heater.off_at_c, 185.0);
    assert_eq!(cfg.valve.open_ms, 2_000);
    assert_eq!(cfg.valve.cooldown_ms, 10_000);
    assert!(cfg.valve.active_low);
    assert_eq!(cfg.retraction.tolerance_mm, 2.0);
    assert_eq!(cfg.retraction.baseline_samples, 5);
    assert_eq!(cfg.cycle.period_ms, 500);
    assert_eq!(cfg.timeouts.echo_ms, 30);
    assert!(cfg.pins.trigger_in.is_none());
}

#[rstest]
#[case::inverted_hysteresis_band(
    "[heater]\non_below_c = 185.0\noff_at_c = 180.0",
    "off_at_c must be > heater.on_below_c"
)]
#[case::zero_open_duration("[valve]\nopen_ms = 0", "valve.open_ms must be >= 1")]
#[case::nonpositive_tolerance(
    "[retraction]\ntolerance_mm = 0.0",
    "tolerance_mm must be > 0"
)]
#[case::presence_threshold_above_adc_range(
    "[presence.hand]\nactive_low = true\nthreshold = 2048",
    "presence.hand.threshold"
)]
fn rejects_out_of_range_sections(#[case] section: &str, #[case] message: &str) {
    let toml = format!("{PINS}\n{section}\n");
    let cfg = load_toml(&toml).expect("parse TOML");
    let err = cfg.validate().expect_err("section should be rejected");
    assert!(
        format!("{err}").contains(message),
        "unexpected message: {err}"
    );
}

#[test]
fn rejects_adc_pin_outside_mcp3008_channels() {
    // hand_ir_adc = 9 parses fine but no such MCP3008 channel exists; a
    // release build would silently sample the wrong input.
    let toml = PINS.replace("hand_ir_adc = 0", "hand_ir_adc = 9");
    let cfg = load_toml(&toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should reject channel > 7");
    assert!(format!("{err}").contains("pins.hand_ir_adc"));
}

#[test]
fn accepts_hardware_revision_overrides() {
    // A revision with an active-high workpiece detector, a looser arm
    // tolerance, and a trigger button.
    let toml = format!(
        "{PINS}
trigger_in = 2

[presence.workpiece]
active_low = false
threshold = 512

[retraction]
tolerance_mm = 10.0
baseline_samples = 8
baseline_gap_ms = 25
"
    );
    let cfg = load_toml(&toml).expect("parse TOML");
    cfg.validate().expect("revision overrides should pass");
    assert!(!cfg.presence.workpiece.active_low);
    assert_eq!(cfg.retraction.tolerance_mm, 10.0);
    assert_eq!(cfg.pins.trigger_in, Some(2));
}

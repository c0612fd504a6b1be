//! Human-readable error descriptions and structured JSON error formatting.

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    use press_core::error::{BuildError, PressError};

    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingRangeFinder => {
                "What happened: No range finder was provided to the controller.\nLikely causes: The HC-SR04 failed to initialize or was not wired into the builder.\nHow to fix: Check [pins] range_trig/range_echo and ensure the sensor is created before try_build().".to_string()
            }
            BuildError::MissingThermocouple => {
                "What happened: No thermocouple was provided to the controller.\nLikely causes: The MAX6675 failed to initialize or was not wired into the builder.\nHow to fix: Check [pins] thermo_so/thermo_cs/thermo_sck and the amplifier wiring.".to_string()
            }
            BuildError::MissingWorkpieceInput | BuildError::MissingHandInput => {
                "What happened: A presence input is missing.\nLikely causes: The IR detector or ADC channel failed to initialize.\nHow to fix: Check [pins] workpiece_ir / hand_ir_adc and the SPI wiring of the ADC.".to_string()
            }
            BuildError::MissingPressureInput => {
                "What happened: The pressure input is missing.\nLikely causes: The ADC channel failed to initialize.\nHow to fix: Check [pins] pressure_adc and the SPI wiring of the ADC.".to_string()
            }
            BuildError::MissingHeaterRelay | BuildError::MissingValveRelay => {
                "What happened: A relay output is missing.\nLikely causes: Relay GPIO failed to initialize or was not wired into the builder.\nHow to fix: Check [pins] heater_relay / valve_relay and GPIO permissions.".to_string()
            }
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Missing or out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun. See README for a sample."
            ),
        };
    }

    if let Some(pe) = err.downcast_ref::<PressError>() {
        if let PressError::Calibration(detail) = pe {
            return format!(
                "What happened: Retraction baseline calibration failed ({detail}).\nLikely causes: Ultrasonic sensor unplugged, arm obstructed, or echo timeout too low.\nHow to fix: Verify the HC-SR04 wiring and sight line, or raise timeouts.echo_ms."
            );
        }
        if matches!(pe, PressError::Timeout) {
            return "What happened: A sensor read timed out.\nLikely causes: Wiring/power issues or a timeout configured too low.\nHow to fix: Verify wiring and consider raising timeouts.echo_ms in the config.".to_string();
        }
        return format!(
            "What happened: {pe}.\nLikely causes: See logs.\nHow to fix: Re-run with --log-level=debug or set RUST_LOG for more detail."
        );
    }

    // String-based heuristics for errors coming from init or config
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("gpio") {
        return "What happened: Failed to initialize GPIO.\nLikely causes: Incorrect pin numbers or insufficient GPIO permissions.\nHow to fix: Fix the [pins] values in the config; ensure the process has permission to access GPIO.".to_string();
    }

    if lower.contains("hysteresis") || lower.contains("must be") {
        return format!(
            "What happened: Configuration is invalid ({msg}).\nLikely causes: Out-of-range values in the TOML.\nHow to fix: Edit the TOML config and try again."
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes: calibration failures are distinguishable from the rest.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    use press_core::error::{BuildError, PressError};
    if let Some(PressError::Calibration(_)) = err.downcast_ref::<PressError>() {
        return 3;
    }
    if err.downcast_ref::<BuildError>().is_some() {
        return 2;
    }
    1
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use press_core::error::PressError;
    use serde_json::json;

    let reason = match err.downcast_ref::<PressError>() {
        Some(PressError::Calibration(_)) => "Calibration",
        Some(PressError::Timeout) => "Timeout",
        Some(_) => "Press",
        None => "Error",
    };
    json!({ "reason": reason, "message": humanize(err) }).to_string()
}

#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema for the press controller.
//!
//! All calibration facts that vary by hardware revision live here as named
//! fields (sensor polarities, thresholds, pin assignments, relay polarity)
//! so a revision change is a TOML edit, not a code change. `Config` is
//! deserialized from TOML and validated before the controller is built.
use serde::Deserialize;

/// GPIO / ADC channel assignments.
///
/// `hand_ir_adc` and `pressure_adc` are MCP3008 channel indices; the rest
/// are BCM pin numbers. `trigger_in` is absent on deployments without a
/// manual trigger button.
#[derive(Debug, Deserialize)]
pub struct Pins {
    pub range_trig: u8,
    pub range_echo: u8,
    pub thermo_so: u8,
    pub thermo_cs: u8,
    pub thermo_sck: u8,
    pub workpiece_ir: u8,
    pub hand_ir_adc: u8,
    pub pressure_adc: u8,
    pub heater_relay: u8,
    pub valve_relay: u8,
    pub trigger_in: Option<u8>,
}

/// One presence channel: a threshold over a raw 10-bit reading.
///
/// `active_low = true` means "present" when the reading is at or below the
/// threshold (typical for IR reflectance modules that pull low on detect).
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct PresenceChannel {
    pub active_low: bool,
    pub threshold: u16,
}

impl Default for PresenceChannel {
    fn default() -> Self {
        Self {
            active_low: true,
            threshold: 900,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Presence {
    pub workpiece: PresenceChannel,
    pub hand: PresenceChannel,
}

/// Heater hysteresis band. Heating turns on below `on_below_c` and off at
/// `off_at_c`; inside the band the previous state is held.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Heater {
    pub on_below_c: f32,
    pub off_at_c: f32,
}

impl Default for Heater {
    fn default() -> Self {
        Self {
            on_below_c: 180.0,
            off_at_c: 185.0,
        }
    }
}

/// Valve actuation timing and relay polarity.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Valve {
    /// How long the valve stays open per activation (ms)
    pub open_ms: u64,
    /// Mandatory dwell after a close before the next activation (ms)
    pub cooldown_ms: u64,
    /// Relay board polarity; true = logic LOW energizes the coil
    pub active_low: bool,
}

impl Default for Valve {
    fn default() -> Self {
        Self {
            open_ms: 2_000,
            cooldown_ms: 10_000,
            active_low: true,
        }
    }
}

/// Arm-retraction detection parameters.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Retraction {
    /// Allowed deviation from the startup baseline (mm). Observed
    /// deployments use 2-10 mm depending on mounting rigidity.
    pub tolerance_mm: f32,
    /// Number of startup samples averaged into the baseline
    pub baseline_samples: u32,
    /// Gap between baseline samples (ms)
    pub baseline_gap_ms: u64,
}

impl Default for Retraction {
    fn default() -> Self {
        Self {
            tolerance_mm: 2.0,
            baseline_samples: 5,
            baseline_gap_ms: 50,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Cycle {
    /// Inter-cycle delay (ms)
    pub period_ms: u64,
}

impl Default for Cycle {
    fn default() -> Self {
        Self { period_ms: 500 }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    /// Max wait for the ultrasonic echo per measurement (ms). 30 ms bounds
    /// the range at roughly 5 m.
    pub echo_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { echo_ms: 30 }
    }
}

/// Linear calibration of the pressure transducer (telemetry only).
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Pressure {
    pub unit_per_count: f32,
}

impl Default for Pressure {
    fn default() -> Self {
        Self {
            unit_per_count: 0.08,
        }
    }
}

/// Manual trigger button (optional deployment variant).
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Trigger {
    /// Treat low level as pressed when true
    pub active_low: bool,
    /// Polling interval in milliseconds for the GPIO trigger checker
    pub poll_ms: u64,
}

impl Default for Trigger {
    fn default() -> Self {
        Self {
            active_low: true,
            poll_ms: 5,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub pins: Pins,
    #[serde(default)]
    pub presence: Presence,
    #[serde(default)]
    pub heater: Heater,
    #[serde(default)]
    pub valve: Valve,
    #[serde(default)]
    pub retraction: Retraction,
    #[serde(default)]
    pub cycle: Cycle,
    #[serde(default)]
    pub timeouts: Timeouts,
    #[serde(default)]
    pub pressure: Pressure,
    #[serde(default)]
    pub trigger: Trigger,
    #[serde(default)]
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Heater
        if !self.heater.on_below_c.is_finite() || !self.heater.off_at_c.is_finite() {
            eyre::bail!("heater thresholds must be finite");
        }
        if self.heater.off_at_c <= self.heater.on_below_c {
            eyre::bail!("heater.off_at_c must be > heater.on_below_c (hysteresis band)");
        }

        // Valve
        if self.valve.open_ms == 0 {
            eyre::bail!("valve.open_ms must be >= 1");
        }
        if self.valve.open_ms > 60_000 {
            eyre::bail!("valve.open_ms is unreasonably large (>60s)");
        }
        if self.valve.cooldown_ms > 10 * 60 * 1000 {
            eyre::bail!("valve.cooldown_ms is unreasonably large (>10min)");
        }

        // Retraction
        if !(self.retraction.tolerance_mm > 0.0) {
            eyre::bail!("retraction.tolerance_mm must be > 0");
        }
        if self.retraction.baseline_samples == 0 {
            eyre::bail!("retraction.baseline_samples must be >= 1");
        }

        // Presence thresholds live on the 10-bit ADC scale
        for (name, ch) in [
            ("workpiece", &self.presence.workpiece),
            ("hand", &self.presence.hand),
        ] {
            if ch.threshold > 1023 {
                eyre::bail!("presence.{name}.threshold must be <= 1023");
            }
        }

        // ADC-sourced pins address MCP3008 channels, not GPIO numbers
        for (name, ch) in [
            ("hand_ir_adc", self.pins.hand_ir_adc),
            ("pressure_adc", self.pins.pressure_adc),
        ] {
            if ch > 7 {
                eyre::bail!("pins.{name} must be an MCP3008 channel (0..=7)");
            }
        }

        // Cycle / timeouts
        if self.cycle.period_ms == 0 {
            eyre::bail!("cycle.period_ms must be >= 1");
        }
        if self.timeouts.echo_ms == 0 {
            eyre::bail!("timeouts.echo_ms must be >= 1");
        }

        // Pressure
        if !self.pressure.unit_per_count.is_finite() || self.pressure.unit_per_count < 0.0 {
            eyre::bail!("pressure.unit_per_count must be finite and >= 0");
        }

        // Trigger
        if self.trigger.poll_ms == 0 {
            eyre::bail!("trigger.poll_ms must be >= 1");
        }

        Ok(())
    }
}

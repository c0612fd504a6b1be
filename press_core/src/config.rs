//! Runtime configuration structs for the control core.
//!
//! Defaults carry the reference deployment's calibration: 180/185 °C
//! hysteresis band, 2 s valve open, 10 s cooldown, 2 mm retraction
//! tolerance, 30 ms echo timeout, 500 ms cycle period.

/// Heater hysteresis band `[on_below_c, off_at_c)`.
#[derive(Debug, Clone, Copy)]
pub struct HeaterCfg {
    /// Transition to heating below this temperature (°C)
    pub on_below_c: f32,
    /// Transition to ready at or above this temperature (°C)
    pub off_at_c: f32,
}

impl Default for HeaterCfg {
    fn default() -> Self {
        Self {
            on_below_c: 180.0,
            off_at_c: 185.0,
        }
    }
}

/// Valve actuation timing.
#[derive(Debug, Clone, Copy)]
pub struct ValveCfg {
    /// Open duration per activation (ms). Time-bounded: a press completes
    /// its stroke even if the gate drops mid-open.
    pub open_ms: u64,
    /// Mandatory dwell after a close before the next activation (ms)
    pub cooldown_ms: u64,
}

impl Default for ValveCfg {
    fn default() -> Self {
        Self {
            open_ms: 2_000,
            cooldown_ms: 10_000,
        }
    }
}

/// Arm-retraction detection parameters.
#[derive(Debug, Clone, Copy)]
pub struct RetractionCfg {
    /// Allowed deviation from the startup baseline (mm)
    pub tolerance_mm: f32,
    /// Number of startup samples averaged into the baseline
    pub baseline_samples: u32,
    /// Gap between baseline samples (ms)
    pub baseline_gap_ms: u64,
}

impl Default for RetractionCfg {
    fn default() -> Self {
        Self {
            tolerance_mm: 2.0,
            baseline_samples: 5,
            baseline_gap_ms: 50,
        }
    }
}

/// One presence channel: polarity and threshold over a raw 10-bit reading.
#[derive(Debug, Clone, Copy)]
pub struct PresenceChannelCfg {
    /// Present when the reading is at or below the threshold
    pub active_low: bool,
    pub threshold: u16,
}

impl Default for PresenceChannelCfg {
    fn default() -> Self {
        Self {
            active_low: true,
            threshold: 900,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PresenceCfg {
    pub workpiece: PresenceChannelCfg,
    pub hand: PresenceChannelCfg,
}

/// Cycle pacing.
#[derive(Debug, Clone, Copy)]
pub struct CycleCfg {
    /// Inter-cycle delay (ms)
    pub period_ms: u64,
}

impl Default for CycleCfg {
    fn default() -> Self {
        Self { period_ms: 500 }
    }
}

/// Sensor wait bounds.
#[derive(Debug, Clone, Copy)]
pub struct Timeouts {
    /// Max wait for the ultrasonic echo per measurement (ms)
    pub echo_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { echo_ms: 30 }
    }
}

/// Linear calibration of the pressure transducer (telemetry only).
#[derive(Debug, Clone, Copy)]
pub struct PressureCal {
    pub unit_per_count: f32,
}

impl Default for PressureCal {
    fn default() -> Self {
        Self {
            unit_per_count: 0.08,
        }
    }
}

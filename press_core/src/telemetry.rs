//! Per-cycle telemetry record.

use serde::Serialize;

use crate::heater::HeaterState;
use crate::sample::{DistanceSample, PresenceReading};
use crate::util::{round1, round2};
use crate::valve::ValveState;

/// One control cycle's observable state, serialized as a single JSON line.
///
/// Temperatures and pressures carry two decimals, distance one;
/// `distance_mm` is `null` when the echo timed out.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CycleRecord {
    pub timestamp_ms: u64,
    #[serde(rename = "temperature_C")]
    pub temperature_c: f32,
    pub pressure_unit: f32,
    pub workpiece_present: bool,
    pub hand_present: bool,
    pub distance_mm: Option<f32>,
    pub heater_on: bool,
    pub valve_open: bool,
}

impl CycleRecord {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        timestamp_ms: u64,
        temperature_c: f32,
        pressure_unit: f32,
        presence: PresenceReading,
        distance: DistanceSample,
        heater: HeaterState,
        valve: ValveState,
    ) -> Self {
        Self {
            timestamp_ms,
            temperature_c: round2(temperature_c),
            pressure_unit: round2(pressure_unit),
            workpiece_present: presence.workpiece_present,
            hand_present: presence.hand_present,
            distance_mm: distance.as_option().map(round1),
            heater_on: heater == HeaterState::Heating,
            valve_open: matches!(valve, ValveState::Open { .. }),
        }
    }

    /// Newline-free JSON object; the caller appends the newline.
    pub fn to_json_line(&self) -> String {
        // Serialization of this struct cannot fail: no maps, no non-string
        // keys, no non-finite floats reach it after rounding.
        serde_json::to_string(self).unwrap_or_else(|e| {
            tracing::error!(error = %e, "telemetry serialization failed");
            String::from("{}")
        })
    }
}

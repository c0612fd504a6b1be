//! Small shared helpers.

/// Full scale of the 10-bit ADC channels.
pub const ADC_MAX: u16 = 1023;

/// Clamp a raw reading to the 10-bit scale. Returns the clamped value and
/// whether clamping happened, so callers can log the anomaly.
pub fn clamp_adc(raw: u16) -> (u16, bool) {
    if raw > ADC_MAX {
        (ADC_MAX, true)
    } else {
        (raw, false)
    }
}

/// Round to one decimal place for telemetry.
pub fn round1(v: f32) -> f32 {
    (v * 10.0).round() / 10.0
}

/// Round to two decimal places for telemetry.
pub fn round2(v: f32) -> f32 {
    (v * 100.0).round() / 100.0
}

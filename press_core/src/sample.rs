//! Per-cycle sensor readings.

/// One time-of-flight distance measurement.
///
/// `valid = false` marks an echo timeout. Consumers must treat an invalid
/// sample as "no update": zero would be indistinguishable from the arm
/// touching the sensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceSample {
    pub millimeters: f32,
    pub valid: bool,
}

impl DistanceSample {
    pub fn valid(millimeters: f32) -> Self {
        Self {
            millimeters,
            valid: true,
        }
    }

    pub fn invalid() -> Self {
        Self {
            millimeters: 0.0,
            valid: false,
        }
    }

    /// Build from a range finder result (`None` = echo timeout).
    pub fn from_echo(mm: Option<f32>) -> Self {
        match mm {
            Some(mm) => Self::valid(mm),
            None => Self::invalid(),
        }
    }

    /// Telemetry form: `None` when the sensor timed out.
    pub fn as_option(&self) -> Option<f32> {
        self.valid.then_some(self.millimeters)
    }
}

/// Instantaneous presence readings, recomputed every cycle. No debounce:
/// the thresholded value is used as-is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PresenceReading {
    pub workpiece_present: bool,
    pub hand_present: bool,
}

#[cfg(test)]
mod tests {
    use super::DistanceSample;

    #[test]
    fn echo_timeout_yields_invalid_sample() {
        let s = DistanceSample::from_echo(None);
        assert!(!s.valid);
        assert_eq!(s.as_option(), None);
    }

    #[test]
    fn fresh_echo_yields_valid_sample() {
        let s = DistanceSample::from_echo(Some(104.5));
        assert!(s.valid);
        assert_eq!(s.as_option(), Some(104.5));
    }
}

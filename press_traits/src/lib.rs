pub mod clock;

pub use clock::{Clock, MonotonicClock};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// One-shot time-of-flight distance measurement.
///
/// `Ok(Some(mm))` is a fresh reading; `Ok(None)` means no echo arrived within
/// `timeout`. A timeout is a normal per-cycle outcome, not an error.
pub trait RangeFinder {
    fn measure(&mut self, timeout: std::time::Duration) -> Result<Option<f32>, BoxError>;
}

/// Thermocouple amplifier returning the plate temperature in °C.
pub trait Thermocouple {
    fn read_celsius(&mut self) -> Result<f32, BoxError>;
}

/// Raw 10-bit input (0..=1023). Digital inputs are adapted to the rail
/// values 0 and 1023 so presence thresholds work uniformly.
pub trait AnalogInput {
    fn read_raw(&mut self) -> Result<u16, BoxError>;
}

/// Two-state actuator output (relay). `set_active(true)` asserts the load;
/// electrical polarity (active-low relay boards) is the implementation's
/// concern. Writes must be idempotent.
pub trait Relay {
    fn set_active(&mut self, active: bool) -> Result<(), BoxError>;
}

//! Mapping from boxed adapter errors to typed `PressError`.

use crate::error::PressError;

/// Map any adapter error to a typed `PressError`, with precise handling for
/// hardware errors when the `hardware-errors` feature is enabled.
pub fn map_hw_error(e: &(dyn std::error::Error + 'static)) -> PressError {
    #[cfg(feature = "hardware-errors")]
    {
        use press_hardware::error::HwError;
        if let Some(hw) = e.downcast_ref::<HwError>() {
            return match hw {
                HwError::ThermocoupleOpen => PressError::HardwareFault(hw.to_string()),
                other => PressError::Hardware(other.to_string()),
            };
        }
    }
    let s = e.to_string();
    if s.to_lowercase().contains("timeout") {
        PressError::Timeout
    } else {
        PressError::Hardware(s)
    }
}

//! Device adapters for the press controller.
//!
//! Simulated implementations are always available and keep stdout free for
//! telemetry by reporting through `tracing`. Real Raspberry Pi adapters sit
//! behind the `hardware` feature (rppal).

pub mod error;
pub mod util;

#[cfg(feature = "hardware")]
pub mod hc_sr04;
#[cfg(feature = "hardware")]
pub mod max6675;
#[cfg(feature = "hardware")]
pub mod mcp3008;

use std::sync::Arc;
use std::sync::atomic::{AtomicU16, Ordering};
use std::time::Duration;

use press_traits::{AnalogInput, RangeFinder, Relay, Thermocouple};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Simulated range finder: a steady distance with a small alternating
/// wobble, the way a parked arm actually reads.
pub struct SimulatedRange {
    mm: f32,
    tick: u32,
}

impl SimulatedRange {
    pub fn new(mm: f32) -> Self {
        Self { mm, tick: 0 }
    }
}

impl RangeFinder for SimulatedRange {
    fn measure(&mut self, _timeout: Duration) -> Result<Option<f32>, BoxError> {
        self.tick = self.tick.wrapping_add(1);
        let wobble = if self.tick % 2 == 0 { 0.2 } else { -0.2 };
        Ok(Some(self.mm + wobble))
    }
}

/// Simulated plate: ramps up from ambient, then oscillates through the
/// working band as a real heater under hysteresis control would.
pub struct SimulatedThermo {
    temp_c: f32,
    rising: bool,
}

impl SimulatedThermo {
    pub fn new() -> Self {
        Self {
            temp_c: 25.0,
            rising: true,
        }
    }
}

impl Default for SimulatedThermo {
    fn default() -> Self {
        Self::new()
    }
}

impl Thermocouple for SimulatedThermo {
    fn read_celsius(&mut self) -> Result<f32, BoxError> {
        if self.rising {
            self.temp_c += 2.0;
            if self.temp_c >= 186.0 {
                self.rising = false;
            }
        } else {
            self.temp_c -= 0.5;
            if self.temp_c < 181.0 {
                self.rising = true;
            }
        }
        Ok(self.temp_c)
    }
}

/// Simulated 10-bit input whose value can be changed from the outside
/// through a shared handle, for driving demo scenarios.
pub struct SimulatedAnalog {
    raw: Arc<AtomicU16>,
}

impl SimulatedAnalog {
    pub fn new(raw: u16) -> Self {
        Self {
            raw: Arc::new(AtomicU16::new(raw)),
        }
    }

    pub fn handle(&self) -> Arc<AtomicU16> {
        Arc::clone(&self.raw)
    }
}

impl AnalogInput for SimulatedAnalog {
    fn read_raw(&mut self) -> Result<u16, BoxError> {
        Ok(self.raw.load(Ordering::Relaxed))
    }
}

/// Simulated relay: records state transitions in the log stream.
pub struct SimulatedRelay {
    name: &'static str,
    active: bool,
}

impl SimulatedRelay {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            active: false,
        }
    }
}

impl Relay for SimulatedRelay {
    fn set_active(&mut self, active: bool) -> Result<(), BoxError> {
        if active != self.active {
            tracing::info!(relay = self.name, active, "relay switched (simulated)");
        }
        self.active = active;
        Ok(())
    }
}

#[cfg(feature = "hardware")]
pub use hardware::{
    DigitalLevelInput, HardwareRange, HardwareRelay, HardwareThermo, make_trigger_checker,
};

#[cfg(feature = "hardware")]
mod hardware {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use press_traits::{AnalogInput, RangeFinder, Relay, Thermocouple};
    use rppal::gpio::Gpio;

    use crate::BoxError;
    use crate::error::{HwError, Result};
    use crate::hc_sr04::HcSr04;
    use crate::max6675::Max6675;

    fn gpio() -> Result<Gpio> {
        Gpio::new().map_err(|e| HwError::Gpio(e.to_string()))
    }

    pub struct HardwareRange {
        dev: HcSr04,
    }

    impl HardwareRange {
        pub fn new(trig_pin: u8, echo_pin: u8) -> Result<Self> {
            let gpio = gpio()?;
            let trig = gpio
                .get(trig_pin)
                .map_err(|e| HwError::Gpio(e.to_string()))?
                .into_output();
            let echo = gpio
                .get(echo_pin)
                .map_err(|e| HwError::Gpio(e.to_string()))?
                .into_input();
            Ok(Self {
                dev: HcSr04::new(trig, echo)?,
            })
        }
    }

    impl RangeFinder for HardwareRange {
        fn measure(&mut self, timeout: Duration) -> std::result::Result<Option<f32>, BoxError> {
            Ok(self.dev.measure_mm(timeout)?)
        }
    }

    pub struct HardwareThermo {
        dev: Max6675,
    }

    impl HardwareThermo {
        pub fn new(so_pin: u8, cs_pin: u8, sck_pin: u8) -> Result<Self> {
            let gpio = gpio()?;
            let so = gpio
                .get(so_pin)
                .map_err(|e| HwError::Gpio(e.to_string()))?
                .into_input();
            let cs = gpio
                .get(cs_pin)
                .map_err(|e| HwError::Gpio(e.to_string()))?
                .into_output();
            let sck = gpio
                .get(sck_pin)
                .map_err(|e| HwError::Gpio(e.to_string()))?
                .into_output();
            Ok(Self {
                dev: Max6675::new(so, cs, sck)?,
            })
        }
    }

    impl Thermocouple for HardwareThermo {
        fn read_celsius(&mut self) -> std::result::Result<f32, BoxError> {
            Ok(self.dev.read_celsius()?)
        }
    }

    /// Relay board output. `active_low` boards energize on a low level.
    pub struct HardwareRelay {
        pin: rppal::gpio::OutputPin,
        active_low: bool,
    }

    impl HardwareRelay {
        pub fn new(pin_num: u8, active_low: bool) -> Result<Self> {
            let mut pin = gpio()?
                .get(pin_num)
                .map_err(|e| HwError::Gpio(e.to_string()))?
                .into_output();
            // park released
            if active_low {
                pin.set_high();
            } else {
                pin.set_low();
            }
            Ok(Self { pin, active_low })
        }
    }

    impl Relay for HardwareRelay {
        fn set_active(&mut self, active: bool) -> std::result::Result<(), BoxError> {
            if active != self.active_low {
                self.pin.set_high();
            } else {
                self.pin.set_low();
            }
            Ok(())
        }
    }

    /// Digital detector adapted to the 10-bit scale: low reads 0, high
    /// reads 1023, so presence thresholds apply uniformly.
    pub struct DigitalLevelInput {
        pin: rppal::gpio::InputPin,
    }

    impl DigitalLevelInput {
        pub fn new(pin_num: u8) -> Result<Self> {
            let pin = gpio()?
                .get(pin_num)
                .map_err(|e| HwError::Gpio(e.to_string()))?
                .into_input_pullup();
            Ok(Self { pin })
        }
    }

    impl AnalogInput for DigitalLevelInput {
        fn read_raw(&mut self) -> std::result::Result<u16, BoxError> {
            Ok(if self.pin.is_high() { 1023 } else { 0 })
        }
    }

    /// Spawn a poller thread for a momentary trigger button and return the
    /// checker closure the control core consults once per cycle.
    pub fn make_trigger_checker(
        pin_num: u8,
        active_low: bool,
        poll: Duration,
    ) -> Result<impl Fn() -> bool + Send + use<>> {
        let pin = gpio()?
            .get(pin_num)
            .map_err(|e| HwError::Gpio(e.to_string()))?
            .into_input_pullup();
        let pressed = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&pressed);
        std::thread::spawn(move || {
            loop {
                let level_high = pin.is_high();
                flag.store(level_high != active_low, Ordering::Relaxed);
                std::thread::sleep(poll);
            }
        });
        Ok(move || pressed.load(Ordering::Relaxed))
    }
}

//! MAX6675 K-type thermocouple amplifier, bit-banged over SO/CS/SCK.

use std::time::Duration;
use tracing::trace;

use crate::error::{HwError, Result};

/// LSB weight of the 12-bit reading.
const C_PER_LSB: f32 = 0.25;

pub struct Max6675 {
    so: rppal::gpio::InputPin,
    cs: rppal::gpio::OutputPin,
    sck: rppal::gpio::OutputPin,
}

impl Max6675 {
    pub fn new(
        so: rppal::gpio::InputPin,
        mut cs: rppal::gpio::OutputPin,
        mut sck: rppal::gpio::OutputPin,
    ) -> Result<Self> {
        cs.set_high(); // deselected
        sck.set_low();
        Ok(Self { so, cs, sck })
    }

    /// Clock out one 16-bit frame and decode it. Bit D2 set means the
    /// thermocouple is open.
    pub fn read_celsius(&mut self) -> Result<f32> {
        self.cs.set_low();
        settle();

        let mut frame: u16 = 0;
        for _ in 0..16 {
            self.sck.set_high();
            settle();
            frame = (frame << 1) | u16::from(self.so.is_high());
            self.sck.set_low();
            settle();
        }
        self.cs.set_high();

        if frame & 0x0004 != 0 {
            return Err(HwError::ThermocoupleOpen);
        }
        let temp = f32::from((frame >> 3) & 0x0FFF) * C_PER_LSB;
        trace!(frame, temp, "thermocouple frame");
        Ok(temp)
    }
}

#[inline]
fn settle() {
    std::thread::sleep(Duration::from_micros(1));
}

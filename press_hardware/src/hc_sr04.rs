//! HC-SR04 ultrasonic range finder, bit-banged over two GPIO lines.

use std::thread::sleep;
use std::time::{Duration, Instant};
use tracing::trace;

use crate::error::Result;
use crate::util::wait_for;

/// Speed of sound at room temperature, in mm per microsecond.
const SOUND_MM_PER_US: f32 = 0.343;

pub struct HcSr04 {
    trig: rppal::gpio::OutputPin,
    echo: rppal::gpio::InputPin,
}

impl HcSr04 {
    pub fn new(mut trig: rppal::gpio::OutputPin, echo: rppal::gpio::InputPin) -> Result<Self> {
        trig.set_low();
        Ok(Self { trig, echo })
    }

    /// One measurement: 10 µs trigger pulse, then a bounded wait for the
    /// echo pulse. `Ok(None)` when either edge misses the deadline.
    pub fn measure_mm(&mut self, timeout: Duration) -> Result<Option<f32>> {
        self.trig.set_low();
        sleep(Duration::from_micros(2));
        self.trig.set_high();
        sleep(Duration::from_micros(10));
        self.trig.set_low();

        let deadline = Instant::now() + timeout;
        let echo = &self.echo;
        if !wait_for(|| echo.is_high(), deadline) {
            return Ok(None);
        }
        let rise = Instant::now();
        if !wait_for(|| echo.is_low(), deadline) {
            return Ok(None);
        }
        let us = rise.elapsed().as_micros() as f32;

        // Round trip: halve before converting to distance.
        let mm = us * SOUND_MM_PER_US / 2.0;
        trace!(us, mm, "echo measured");
        Ok(Some(mm))
    }
}

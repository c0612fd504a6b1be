//! MCP3008 10-bit ADC over hardware SPI.

use std::sync::{Arc, Mutex};
use tracing::trace;

use crate::error::{HwError, Result};
use rppal::spi::{Bus, Mode, SlaveSelect, Spi};

pub struct Mcp3008 {
    spi: Spi,
}

impl Mcp3008 {
    pub fn new(bus: Bus, ss: SlaveSelect, clock_hz: u32) -> Result<Self> {
        let spi =
            Spi::new(bus, ss, clock_hz, Mode::Mode0).map_err(|e| HwError::Spi(e.to_string()))?;
        Ok(Self { spi })
    }

    /// The usual wiring: SPI0 with chip select 0.
    pub fn on_spi0(clock_hz: u32) -> Result<Self> {
        Self::new(Bus::Spi0, SlaveSelect::Ss0, clock_hz)
    }

    /// Single-ended conversion on `channel` (0..=7).
    pub fn read_channel(&mut self, channel: u8) -> Result<u16> {
        debug_assert!(channel < 8);
        let tx = [0x01, (0x08 | channel) << 4, 0x00];
        let mut rx = [0u8; 3];
        self.spi
            .transfer(&mut rx, &tx)
            .map_err(|e| HwError::Spi(e.to_string()))?;
        let value = (u16::from(rx[1] & 0x03) << 8) | u16::from(rx[2]);
        trace!(channel, value, "adc conversion");
        Ok(value)
    }
}

/// One ADC channel as an `AnalogInput`, sharing the SPI device between
/// channels.
pub struct Mcp3008Channel {
    dev: Arc<Mutex<Mcp3008>>,
    channel: u8,
}

impl Mcp3008Channel {
    pub fn new(dev: Arc<Mutex<Mcp3008>>, channel: u8) -> Self {
        Self { dev, channel }
    }
}

impl press_traits::AnalogInput for Mcp3008Channel {
    fn read_raw(&mut self) -> std::result::Result<u16, Box<dyn std::error::Error + Send + Sync>> {
        let mut dev = self
            .dev
            .lock()
            .map_err(|_| HwError::Spi("adc mutex poisoned".to_owned()))?;
        Ok(dev.read_channel(self.channel)?)
    }
}

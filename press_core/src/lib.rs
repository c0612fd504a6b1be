#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Control core for a heated pneumatic press (hardware-agnostic).
//!
//! All hardware interactions go through the `press_traits` seam traits; the
//! binary wires in real GPIO adapters or simulations from `press_hardware`.
//!
//! ## Architecture
//!
//! - **Heater**: two-threshold hysteresis over the plate temperature
//!   (`heater` module)
//! - **Retraction**: live distance vs. a startup baseline (`retraction`
//!   module, calibrated once via `PressCore::calibrate`)
//! - **Presence**: threshold + polarity over raw 10-bit readings
//!   (`presence` module)
//! - **Gate**: the memoryless safety conjunction (`gate` module)
//! - **Valve**: timed open stroke + mandatory cooldown state machine
//!   (`valve` module)
//! - **Engine**: `PressCore` owns all device handles and mutable control
//!   state; `step()` advances one cycle and yields a `CycleRecord`
//! - **Runner**: calibrate-then-loop drivers (`runner` module)

pub mod config;
pub mod conversions;
pub mod error;
pub mod gate;
pub mod heater;
pub mod hw_error;
pub mod mocks;
pub mod presence;
pub mod press;
pub mod retraction;
pub mod runner;
pub mod sample;
pub mod telemetry;
pub mod util;
pub mod valve;

pub use config::{
    CycleCfg, HeaterCfg, PresenceCfg, PresenceChannelCfg, PressureCal, RetractionCfg, Timeouts,
    ValveCfg,
};
pub use error::{BuildError, PressError};
pub use gate::{GateInputs, may_actuate};
pub use heater::{HeaterController, HeaterState};
pub use press::{PressBuilder, PressCore};
pub use retraction::RetractionTracker;
pub use sample::{DistanceSample, PresenceReading};
pub use telemetry::CycleRecord;
pub use valve::{ValveCommand, ValveController, ValveState};

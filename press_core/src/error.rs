use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum PressError {
    #[error("hardware error: {0}")]
    Hardware(String),
    #[error("hardware fault: {0}")]
    HardwareFault(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("timeout waiting for sensor")]
    Timeout,
    #[error("calibration failed: {0}")]
    Calibration(String),
    #[error("invalid state: {0}")]
    State(String),
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("missing range finder")]
    MissingRangeFinder,
    #[error("missing thermocouple")]
    MissingThermocouple,
    #[error("missing workpiece presence input")]
    MissingWorkpieceInput,
    #[error("missing hand presence input")]
    MissingHandInput,
    #[error("missing pressure input")]
    MissingPressureInput,
    #[error("missing heater relay")]
    MissingHeaterRelay,
    #[error("missing valve relay")]
    MissingValveRelay,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;

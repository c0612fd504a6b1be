use thiserror::Error;

#[derive(Debug, Error)]
pub enum HwError {
    #[error("gpio error: {0}")]
    Gpio(String),
    #[error("spi error: {0}")]
    Spi(String),
    #[error("thermocouple fault: open circuit")]
    ThermocoupleOpen,
}

pub type Result<T> = std::result::Result<T, HwError>;

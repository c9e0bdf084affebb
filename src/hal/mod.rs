//! Hardware Abstraction Layer for TouchAlarm (ESP32-S3).
//!
//! Thin wrappers around ESP-IDF peripherals.
//! Business logic stays in core modules, HAL is just I/O.

pub mod board;
pub mod gpio;
pub mod keypad;
pub mod tone;
pub mod touch;

pub use board::EspBoard;

use esp_idf_svc::sys::EspError;

use crate::fault::FaultCode;

/// Peripheral setup errors. All of them are fatal.
#[derive(Debug)]
pub enum HalError {
    /// Sample timer could not be configured
    Timer(EspError),
    /// LEDC analog output could not be configured
    Output(EspError),
    /// LED, probe or keypad pins could not be configured
    Gpio(EspError),
    /// Touch controller could not be configured
    Touch(EspError),
}

impl HalError {
    /// Fault code recorded for this error.
    pub fn fault_code(&self) -> FaultCode {
        match self {
            Self::Timer(_) => FaultCode::TimerInit,
            Self::Output(_) => FaultCode::OutputInit,
            Self::Gpio(_) | Self::Touch(_) => FaultCode::GpioInit,
        }
    }

    fn esp_error(&self) -> &EspError {
        match self {
            Self::Timer(e) | Self::Output(e) | Self::Gpio(e) | Self::Touch(e) => e,
        }
    }
}

impl core::fmt::Display for HalError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let what = match self {
            Self::Timer(_) => "sample timer",
            Self::Output(_) => "analog output",
            Self::Gpio(_) => "gpio",
            Self::Touch(_) => "touch sensor",
        };
        write!(f, "{} init failed: {}", what, self.esp_error())
    }
}

//! Error types for hardware operations.
//!
//! This module defines error types specific to the reader and the GPIO
//! lines: disconnection, communication failures and initialization errors.

use std::io::ErrorKind;

/// Result type alias for hardware operations.
pub type Result<T> = std::result::Result<T, HardwareError>;

/// Errors that can occur during hardware device operations.
#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    /// Device is not connected or has been disconnected.
    #[error("Device disconnected: {device}")]
    Disconnected { device: String },

    /// Device communication error.
    #[error("Communication error: {message}")]
    CommunicationError { message: String },

    /// Device initialization failed.
    #[error("Initialization failed: {message}")]
    InitializationFailed { message: String },

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HardwareError {
    /// Create a new disconnected error.
    pub fn disconnected(device: impl Into<String>) -> Self {
        Self::Disconnected {
            device: device.into(),
        }
    }

    /// Create a new communication error.
    pub fn communication(message: impl Into<String>) -> Self {
        Self::CommunicationError {
            message: message.into(),
        }
    }

    /// Create a new initialization failed error.
    pub fn initialization_failed(message: impl Into<String>) -> Self {
        Self::InitializationFailed {
            message: message.into(),
        }
    }

    /// Classify a failed read from `device`.
    ///
    /// End of stream means the device went away; anything else is a
    /// communication error carrying the OS message.
    pub fn from_read_error(device: &str, error: std::io::Error) -> Self {
        match error.kind() {
            ErrorKind::UnexpectedEof => Self::disconnected(device),
            _ => Self::communication(format!("{device}: {error}")),
        }
    }
}

#[cfg(feature = "hardware-gpio")]
impl From<rppal::gpio::Error> for HardwareError {
    fn from(error: rppal::gpio::Error) -> Self {
        Self::initialization_failed(format!("GPIO: {error}"))
    }
}

impl From<serialport::Error> for HardwareError {
    fn from(error: serialport::Error) -> Self {
        Self::initialization_failed(format!("serial port: {error}"))
    }
}

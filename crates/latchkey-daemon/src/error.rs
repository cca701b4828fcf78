//! Process-level errors.
//!
//! Every variant is fatal. The daemon does not recover in-process: it exits
//! with a status that tells the supervisor what went wrong and relies on it
//! to restart the service.

use std::fmt;

use latchkey_hardware::HardwareError;

/// Result type alias for daemon operations.
pub type Result<T> = std::result::Result<T, DaemonError>;

/// Startup step that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupStage {
    /// Acquiring the door GPIO lines.
    Gpio,

    /// Loading the authorization file for the first time.
    AuthorizationTable,

    /// Installing the authorization file watch.
    Watcher,

    /// Opening the serial reader.
    SerialDevice,
}

impl fmt::Display for StartupStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpio => write!(f, "gpio"),
            Self::AuthorizationTable => write!(f, "authorization table"),
            Self::Watcher => write!(f, "watcher"),
            Self::SerialDevice => write!(f, "serial device"),
        }
    }
}

/// Fatal daemon errors.
#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    /// A resource needed to start could not be acquired.
    #[error("Startup failed at {stage}: {message}")]
    Startup {
        stage: StartupStage,
        message: String,
    },

    /// The reader stream failed. The device handle is not reused.
    #[error("Reader {device} failed: {message}")]
    Stream { device: String, message: String },

    /// The door outputs could not be driven.
    #[error("Door actuator failed: {0}")]
    Actuator(#[from] HardwareError),

    /// Every event producer has stopped.
    #[error("Event channel closed")]
    EventChannelClosed,
}

impl DaemonError {
    /// Create a startup error for `stage`.
    pub fn startup(stage: StartupStage, cause: impl fmt::Display) -> Self {
        Self::Startup {
            stage,
            message: cause.to_string(),
        }
    }

    /// Create a stream error for `device`.
    pub fn stream(device: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Stream {
            device: device.into(),
            message: message.into(),
        }
    }

    /// Process exit status for this error.
    ///
    /// | Status | Meaning |
    /// |--------|---------|
    /// | 2 | startup failure |
    /// | 3 | reader stream failure or lost event channel |
    /// | 4 | actuator failure |
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Startup { .. } => 2,
            Self::Stream { .. } | Self::EventChannelClosed => 3,
            Self::Actuator(_) => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_startup_error_display() {
        let error = DaemonError::startup(StartupStage::SerialDevice, "No such file or directory");
        assert_eq!(
            error.to_string(),
            "Startup failed at serial device: No such file or directory"
        );
    }

    #[test]
    fn test_stream_error_display() {
        let error = DaemonError::stream("/dev/ttyUSB0", "Device disconnected: /dev/ttyUSB0");
        assert_eq!(
            error.to_string(),
            "Reader /dev/ttyUSB0 failed: Device disconnected: /dev/ttyUSB0"
        );
    }

    #[test]
    fn test_actuator_error_from_hardware() {
        let error: DaemonError = HardwareError::communication("gpio write").into();
        assert_eq!(
            error.to_string(),
            "Door actuator failed: Communication error: gpio write"
        );
    }

    #[rstest]
    #[case(DaemonError::startup(StartupStage::Gpio, "busy"), 2)]
    #[case(DaemonError::startup(StartupStage::AuthorizationTable, "missing"), 2)]
    #[case(DaemonError::stream("/dev/ttyUSB0", "eof"), 3)]
    #[case(DaemonError::EventChannelClosed, 3)]
    #[case(DaemonError::Actuator(HardwareError::communication("x")), 4)]
    fn test_exit_codes(#[case] error: DaemonError, #[case] code: u8) {
        assert_eq!(error.exit_code(), code);
    }
}

//! Enum wrapper for output line dispatch.
//!
//! The daemon picks its lines at runtime (real GPIO on the door controller,
//! mock lines in tests and dry runs). Wrapping them in an enum keeps the
//! actuator generic code monomorphic and lets the GPIO variant disappear
//! when the `hardware-gpio` feature is off.
//!
//! # Examples
//!
//! ```
//! use latchkey_hardware::devices::AnyOutputLine;
//! use latchkey_hardware::mock::MockLine;
//! use latchkey_hardware::traits::OutputLine;
//!
//! let (line, handle) = MockLine::new();
//! let mut any_line = AnyOutputLine::Mock(line);
//! any_line.set_high().unwrap();
//! assert!(handle.level().is_high());
//! ```

#[cfg(feature = "hardware-gpio")]
use crate::gpio::GpioLine;
use crate::mock::MockLine;
use crate::traits::OutputLine;
use crate::{LineLevel, Result};

/// Enum wrapper for output line dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyOutputLine {
    /// Raspberry Pi GPIO pin.
    #[cfg(feature = "hardware-gpio")]
    Gpio(GpioLine),

    /// Mock line for development and testing.
    Mock(MockLine),
}

impl OutputLine for AnyOutputLine {
    fn set_level(&mut self, level: LineLevel) -> Result<()> {
        match self {
            #[cfg(feature = "hardware-gpio")]
            Self::Gpio(line) => line.set_level(level),
            Self::Mock(line) => line.set_level(level),
        }
    }

    fn level(&self) -> LineLevel {
        match self {
            #[cfg(feature = "hardware-gpio")]
            Self::Gpio(line) => line.level(),
            Self::Mock(line) => line.level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_output_line_mock() {
        let (line, handle) = MockLine::new();
        let mut any_line = AnyOutputLine::Mock(line);

        any_line.set_high().unwrap();
        assert_eq!(any_line.level(), LineLevel::High);
        assert_eq!(handle.pulse_count(), 1);

        any_line.set_low().unwrap();
        assert_eq!(handle.level(), LineLevel::Low);
    }
}

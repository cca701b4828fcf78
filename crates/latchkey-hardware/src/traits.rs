//! Hardware device trait definitions.
//!
//! The door is driven through plain digital outputs. [`OutputLine`] is the
//! contract between the actuator logic and a concrete line (a Raspberry Pi
//! GPIO pin or a mock recording every transition).

use crate::error::Result;
use crate::types::LineLevel;

/// A single digital output.
///
/// Writes are synchronous: toggling a GPIO pin is a register write, not I/O
/// worth awaiting.
///
/// # Examples
///
/// ```
/// use latchkey_hardware::mock::MockLine;
/// use latchkey_hardware::traits::OutputLine;
/// use latchkey_hardware::types::LineLevel;
///
/// let (mut line, handle) = MockLine::new();
/// line.set_high().unwrap();
/// assert_eq!(handle.level(), LineLevel::High);
/// line.set_low().unwrap();
/// assert_eq!(line.level(), LineLevel::Low);
/// ```
pub trait OutputLine: Send {
    /// Drive the line to `level`.
    ///
    /// # Errors
    ///
    /// Returns an error if the line can no longer be written.
    fn set_level(&mut self, level: LineLevel) -> Result<()>;

    /// The level the line is currently driven to.
    fn level(&self) -> LineLevel;

    /// Drive the line active.
    fn set_high(&mut self) -> Result<()> {
        self.set_level(LineLevel::High)
    }

    /// Drive the line inactive.
    fn set_low(&mut self) -> Result<()> {
        self.set_level(LineLevel::Low)
    }
}

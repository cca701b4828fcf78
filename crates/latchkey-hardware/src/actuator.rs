//! Door strike actuator.
//!
//! [`DoorActuator`] owns the two door outputs. Unlocking drives the open
//! line high for a fixed pulse and then releases it. The close line is
//! acquired and held low so the pin is reserved, but nothing drives it.
//!
//! # Examples
//!
//! ```
//! use latchkey_hardware::actuator::DoorActuator;
//! use latchkey_hardware::mock::MockLine;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> latchkey_hardware::Result<()> {
//!     let (open, open_handle) = MockLine::new();
//!     let (close, _close_handle) = MockLine::new();
//!
//!     let mut actuator = DoorActuator::new(open, close)?.with_pulse(Duration::from_millis(10));
//!     actuator.unlock().await?;
//!
//!     assert_eq!(open_handle.pulse_count(), 1);
//!     assert!(!open_handle.level().is_high());
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use latchkey_core::constants::UNLOCK_PULSE;
use tracing::{debug, warn};

use crate::Result;
use crate::traits::OutputLine;
use crate::types::LineRole;

/// Drives the door outputs.
#[derive(Debug)]
pub struct DoorActuator<L> {
    open: L,
    close: L,
    pulse: Duration,
}

impl<L: OutputLine> DoorActuator<L> {
    /// Take ownership of both lines and drive them low.
    ///
    /// # Errors
    ///
    /// Returns an error if either line cannot be written.
    pub fn new(mut open: L, mut close: L) -> Result<Self> {
        open.set_low()?;
        close.set_low()?;

        Ok(Self {
            open,
            close,
            pulse: UNLOCK_PULSE,
        })
    }

    /// Override the pulse length.
    pub fn with_pulse(mut self, pulse: Duration) -> Self {
        self.pulse = pulse;
        self
    }

    /// Pulse length used by [`unlock`](Self::unlock).
    pub fn pulse(&self) -> Duration {
        self.pulse
    }

    /// Release the door strike for one pulse.
    ///
    /// Completes only after the open line is back low, so the caller is
    /// stalled for the whole pulse. Callers must not overlap unlocks.
    ///
    /// # Errors
    ///
    /// Returns an error if the open line cannot be written. If raising the
    /// line succeeded but lowering it fails, a second attempt is made
    /// before giving up so the strike is not left energized.
    pub async fn unlock(&mut self) -> Result<()> {
        debug!("Driving {} line high for {:?}", LineRole::Open, self.pulse);
        self.open.set_high()?;

        tokio::time::sleep(self.pulse).await;

        if let Err(e) = self.open.set_low() {
            warn!("Failed to release {} line, retrying: {}", LineRole::Open, e);
            self.open.set_low()?;
        }
        debug!("{} line released", LineRole::Open);
        Ok(())
    }

    /// Whether the door strike is currently energized.
    pub fn is_unlocked(&self) -> bool {
        self.open.level().is_high()
    }

    /// Current level of a line.
    pub fn line_level(&self, role: LineRole) -> crate::LineLevel {
        match role {
            LineRole::Open => self.open.level(),
            LineRole::Close => self.close.level(),
        }
    }
}

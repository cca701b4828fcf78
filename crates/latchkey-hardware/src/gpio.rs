//! Raspberry Pi GPIO output lines.
//!
//! Pins are addressed by BCM number and configured as outputs driven low
//! at acquisition, so the door stays locked while the daemon starts.

use rppal::gpio::{Gpio, OutputPin};
use tracing::debug;

use crate::{Result, traits::OutputLine, types::LineLevel};

/// A GPIO pin configured as a digital output.
#[derive(Debug)]
pub struct GpioLine {
    pin: OutputPin,
}

impl GpioLine {
    /// Acquire BCM pin `bcm` as an output, initially low.
    ///
    /// # Errors
    ///
    /// Returns [`HardwareError::InitializationFailed`] if the GPIO chip
    /// cannot be opened or the pin is already claimed.
    ///
    /// [`HardwareError::InitializationFailed`]: crate::HardwareError::InitializationFailed
    pub fn acquire(bcm: u8) -> Result<Self> {
        let gpio = Gpio::new()?;
        let pin = gpio.get(bcm)?.into_output_low();
        debug!("Configured GPIO {} as output", bcm);
        Ok(Self { pin })
    }

    /// BCM number of the pin.
    pub fn pin(&self) -> u8 {
        self.pin.pin()
    }
}

impl OutputLine for GpioLine {
    fn set_level(&mut self, level: LineLevel) -> Result<()> {
        match level {
            LineLevel::High => self.pin.set_high(),
            LineLevel::Low => self.pin.set_low(),
        }
        Ok(())
    }

    fn level(&self) -> LineLevel {
        if self.pin.is_set_high() {
            LineLevel::High
        } else {
            LineLevel::Low
        }
    }
}

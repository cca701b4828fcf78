//! Serial port access for the RFID reader.

use latchkey_core::constants::{SERIAL_BAUD_RATE, SERIAL_READ_TIMEOUT};
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use tracing::debug;

use crate::Result;

/// Open `path` at 9600 baud, 8N1, no flow control.
///
/// The port is configured with a short read timeout. Timeouts are how the
/// framer polls an idle reader; they are not failures.
///
/// # Errors
///
/// Returns [`HardwareError::InitializationFailed`] if the device does not
/// exist, is busy, or cannot be configured.
///
/// [`HardwareError::InitializationFailed`]: crate::HardwareError::InitializationFailed
pub fn open_serial(path: &str) -> Result<Box<dyn SerialPort>> {
    let port = serialport::new(path, SERIAL_BAUD_RATE)
        .data_bits(DataBits::Eight)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .flow_control(FlowControl::None)
        .timeout(SERIAL_READ_TIMEOUT)
        .open()?;

    debug!(port = path, baud = SERIAL_BAUD_RATE, "Opened serial device");
    Ok(port)
}

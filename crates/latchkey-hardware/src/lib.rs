//! Hardware layer for the latchkey door daemon.
//!
//! Two peripherals are involved in opening a door:
//!
//! - an RFID reader on a serial port, emitting one STX/ETX frame per scan,
//! - a door strike wired to two GPIO outputs (open and close).
//!
//! # Output lines
//!
//! [`OutputLine`] is the seam between door logic and pins. [`GpioLine`]
//! drives a Raspberry Pi pin through rppal (feature `hardware-gpio`, on by
//! default); [`MockLine`] records every transition with a monotonic
//! timestamp for tests. [`AnyOutputLine`] dispatches between them at
//! runtime without trait objects.
//!
//! ```
//! use latchkey_hardware::{DoorActuator, MockLine};
//!
//! # #[tokio::main(flavor = "current_thread", start_paused = true)]
//! # async fn main() -> latchkey_hardware::Result<()> {
//! let (open, handle) = MockLine::new();
//! let (close, _) = MockLine::new();
//! let mut door = DoorActuator::new(open, close)?;
//!
//! door.unlock().await?;
//! assert_eq!(handle.pulse_count(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! # Reader
//!
//! [`open_serial`] opens the reader at 9600 baud 8N1 and
//! [`spawn_reader`] frames its output on a dedicated thread, delivering
//! [`ReaderEvent`]s into a Tokio channel.
//!
//! [`GpioLine`]: gpio::GpioLine

pub mod actuator;
pub mod devices;
pub mod error;
#[cfg(feature = "hardware-gpio")]
pub mod gpio;
pub mod mock;
pub mod reader;
pub mod serial;
pub mod traits;
pub mod types;

pub use actuator::DoorActuator;
pub use devices::AnyOutputLine;
pub use error::{HardwareError, Result};
pub use mock::{MockLine, MockLineHandle};
pub use reader::{ReaderEvent, spawn_reader};
pub use serial::open_serial;
pub use traits::OutputLine;
pub use types::{LineLevel, LineRole, TokenRead};

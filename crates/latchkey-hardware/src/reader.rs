//! Background reader task.
//!
//! Serial reads block, so the reader runs on its own OS thread instead of a
//! Tokio worker. It frames the byte stream with [`TokenFramer`] and pushes
//! one [`ReaderEvent::TokenRead`] per frame into the daemon's event channel.
//!
//! ```text
//! ┌──────────────┐  bytes  ┌─────────────┐  ReaderEvent  ┌──────────────┐
//! │ Serial port  │────────►│ TokenFramer │──────────────►│ Event channel│
//! └──────────────┘         └─────────────┘   (unbounded) └──────────────┘
//! ```
//!
//! On the first hard read failure the thread sends a single
//! [`ReaderEvent::DeviceError`] and exits. It never reopens the device. If
//! the receiving side goes away, the thread stops quietly after the next
//! frame.

use std::io::Read;
use std::thread::JoinHandle;

use latchkey_protocol::TokenFramer;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error, trace};

use crate::error::{HardwareError, Result};
use crate::types::TokenRead;

/// Event produced by the reader thread.
#[derive(Debug, Clone)]
pub enum ReaderEvent {
    /// A complete frame was read.
    TokenRead(TokenRead),

    /// The device failed. No further events follow.
    DeviceError {
        /// Device path or label.
        device: String,

        /// Error message.
        error: String,
    },
}

/// Spawn the reader thread for `source`.
///
/// Events are converted into the caller's event type with `From`, so the
/// daemon can merge reader and watcher output into one channel.
///
/// The join handle resolves to `Ok(())` when the channel closed under the
/// reader, or to the read error that ended it.
///
/// # Errors
///
/// Returns [`HardwareError::Io`] if the OS refuses to create the thread.
///
/// # Examples
///
/// ```
/// use latchkey_hardware::reader::{spawn_reader, ReaderEvent};
/// use std::io::Cursor;
///
/// let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<ReaderEvent>();
/// let source = Cursor::new(b"\x02A1B2C3\x03".to_vec());
///
/// let handle = spawn_reader(source, "cursor", tx).unwrap();
/// assert!(handle.join().unwrap().is_err()); // cursor runs dry
///
/// assert!(matches!(rx.try_recv(), Ok(ReaderEvent::TokenRead(_))));
/// assert!(matches!(rx.try_recv(), Ok(ReaderEvent::DeviceError { .. })));
/// ```
pub fn spawn_reader<R, E>(
    source: R,
    device: impl Into<String>,
    tx: UnboundedSender<E>,
) -> Result<JoinHandle<Result<()>>>
where
    R: Read + Send + 'static,
    E: From<ReaderEvent> + Send + 'static,
{
    let device = device.into();

    let handle = std::thread::Builder::new()
        .name("latchkey-reader".to_string())
        .spawn(move || read_loop(source, device, tx))?;

    Ok(handle)
}

fn read_loop<R, E>(source: R, device: String, tx: UnboundedSender<E>) -> Result<()>
where
    R: Read,
    E: From<ReaderEvent>,
{
    debug!(device = %device, "Reader thread started");
    let mut framer = TokenFramer::new(source);

    loop {
        match framer.next_token() {
            Ok(token) => {
                trace!(device = %device, token = %token, "Frame complete");
                let event = ReaderEvent::TokenRead(TokenRead::now(token));
                if tx.send(E::from(event)).is_err() {
                    debug!(device = %device, "Event channel closed, reader stopping");
                    return Ok(());
                }
            }
            Err(e) => {
                let failure = HardwareError::from_read_error(&device, e);
                error!(device = %device, "Reader failed: {}", failure);

                let _ = tx.send(E::from(ReaderEvent::DeviceError {
                    device: device.clone(),
                    error: failure.to_string(),
                }));
                return Err(failure);
            }
        }
    }
}

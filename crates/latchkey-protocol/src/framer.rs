//! Blocking token framer over a byte source.
//!
//! [`TokenFramer`] pulls bytes from any [`Read`] implementation (the serial
//! port in production, an in-memory cursor in tests) and yields one
//! [`Token`] per reader frame. The sequence is infinite for a healthy
//! device: it only ends after the first hard read failure.
//!
//! # Failure semantics
//!
//! - `TimedOut`, `WouldBlock` and `Interrupted` reads are retried. Serial
//!   drivers use timeouts to poll; an idle reader is not a broken one.
//! - A zero-length read (end of stream) is reported as
//!   [`ErrorKind::UnexpectedEof`]: the device went away.
//! - Any other error is returned unchanged.
//!
//! After an error the framer is exhausted and yields `None` forever. There
//! is no retry: a failed device handle is never read again.
//!
//! # Example
//!
//! ```
//! use latchkey_protocol::TokenFramer;
//! use std::io::Cursor;
//!
//! let stream = Cursor::new(b"\x02A1B2C3\x03\x020000\x03".to_vec());
//! let mut framer = TokenFramer::new(stream);
//!
//! assert_eq!(framer.next().unwrap().unwrap().as_str(), "A1B2C3");
//! assert_eq!(framer.next().unwrap().unwrap().as_str(), "0000");
//!
//! // Cursor exhausted: the "device" disconnected
//! assert!(framer.next().unwrap().is_err());
//! assert!(framer.next().is_none());
//! ```

use std::io::{ErrorKind, Read};

use latchkey_core::Token;

use crate::StreamParser;

/// Size of a single read from the underlying device.
const READ_CHUNK_SIZE: usize = 64;

/// Lazy, blocking iterator of tokens read from a byte source.
pub struct TokenFramer<R> {
    reader: R,
    parser: StreamParser,
    chunk: [u8; READ_CHUNK_SIZE],
    failed: bool,
}

impl<R: Read> TokenFramer<R> {
    /// Create a framer reading from `reader`.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            parser: StreamParser::new(),
            chunk: [0; READ_CHUNK_SIZE],
            failed: false,
        }
    }

    /// Block until the next token is complete.
    ///
    /// # Errors
    ///
    /// Returns the first non-transient read error, or
    /// [`ErrorKind::UnexpectedEof`] if the source reaches end of stream.
    pub fn next_token(&mut self) -> std::io::Result<Token> {
        loop {
            if let Some(token) = self.parser.next_token() {
                return Ok(token);
            }

            match self.reader.read(&mut self.chunk) {
                Ok(0) => {
                    return Err(std::io::Error::new(
                        ErrorKind::UnexpectedEof,
                        "reader stream closed",
                    ));
                }
                Ok(n) => self.parser.feed(&self.chunk[..n]),
                Err(e) if is_transient(&e) => continue,
                Err(e) => return Err(e),
            }
        }
    }

    /// Check whether the framer has stopped after a read failure.
    pub fn is_failed(&self) -> bool {
        self.failed
    }

    /// Get a reference to the underlying byte source.
    pub fn get_ref(&self) -> &R {
        &self.reader
    }
}

impl<R: Read> Iterator for TokenFramer<R> {
    type Item = std::io::Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        match self.next_token() {
            Ok(token) => Some(Ok(token)),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

impl<R: Read> std::iter::FusedIterator for TokenFramer<R> {}

fn is_transient(error: &std::io::Error) -> bool {
    matches!(
        error.kind(),
        ErrorKind::TimedOut | ErrorKind::WouldBlock | ErrorKind::Interrupted
    )
}

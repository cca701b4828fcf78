//! Core constants for the latchkey door daemon.
//!
//! This module centralizes every fixed value the daemon relies on: the
//! reader's wire framing, serial line settings, actuator timing and the
//! GPIO pin assignment. None of these are exposed as command line flags.
//!
//! # Reader Wire Format
//!
//! The serial RFID reader emits one frame per scan:
//!
//! ```text
//! STX  <token characters>  ETX
//! 0x02 A1B2C3              0x03
//! ```
//!
//! # Usage
//!
//! ```
//! use latchkey_core::constants::*;
//!
//! assert_eq!(START_BYTE, 0x02);
//! assert_eq!(END_BYTE, 0x03);
//! assert_eq!(SERIAL_BAUD_RATE, 9600);
//! ```

use std::time::Duration;

// ============================================================================
// Wire Framing
// ============================================================================

/// Start of text marker (STX) that opens a token frame.
pub const START_BYTE: u8 = 0x02;

/// End of text marker (ETX) that terminates a token frame.
pub const END_BYTE: u8 = 0x03;

/// Upper bound for an unterminated frame, in bytes.
///
/// A reader that never sends ETX would otherwise grow the frame buffer
/// without limit. Partial frames beyond this size are discarded.
pub const MAX_FRAME_SIZE: usize = 64 * 1024;

// ============================================================================
// Serial Line
// ============================================================================

/// Fixed baud rate of the reader (8-N-1).
pub const SERIAL_BAUD_RATE: u32 = 9600;

/// Poll interval for blocking serial reads.
///
/// A read that times out simply means no tag was presented; the framer
/// retries it transparently.
pub const SERIAL_READ_TIMEOUT: Duration = Duration::from_secs(1);

/// Default reader device path (conventional USB serial adapter).
pub const DEFAULT_SERIAL_DEVICE: &str = "/dev/ttyUSB0";

// ============================================================================
// Authorization
// ============================================================================

/// Default authorization file, relative to the working directory.
pub const DEFAULT_LIST_PATH: &str = "list.txt";

/// Characters a reader emits for idle or saturated frames.
///
/// A token made only of these characters is noise, not a scan.
///
/// # Examples
///
/// ```
/// use latchkey_core::constants::SENTINEL_CHARS;
///
/// assert!("00FF".chars().all(|c| SENTINEL_CHARS.contains(&c)));
/// ```
pub const SENTINEL_CHARS: [char; 2] = ['0', 'F'];

// ============================================================================
// Timing
// ============================================================================

/// Minimum time between two unlocks.
pub const DEFAULT_DEBOUNCE_WINDOW: Duration = Duration::from_secs(5);

/// How long the open line is held active per unlock.
pub const UNLOCK_PULSE: Duration = Duration::from_secs(1);

// ============================================================================
// GPIO
// ============================================================================

/// BCM pin number of the "open" output driving the door strike.
pub const OPEN_PIN: u8 = 22;

/// BCM pin number of the "close" output.
///
/// Configured as an output at startup and held low; nothing drives it yet.
pub const CLOSE_PIN: u8 = 27;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markers_are_distinct_control_bytes() {
        assert_ne!(START_BYTE, END_BYTE);
        assert!(START_BYTE.is_ascii_control());
        assert!(END_BYTE.is_ascii_control());
    }

    #[test]
    fn test_pulse_is_shorter_than_debounce() {
        assert!(UNLOCK_PULSE < DEFAULT_DEBOUNCE_WINDOW);
    }

    #[test]
    fn test_pins_are_distinct() {
        assert_ne!(OPEN_PIN, CLOSE_PIN);
    }
}

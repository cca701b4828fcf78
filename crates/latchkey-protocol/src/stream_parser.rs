//! Stream parser for reader frames.
//!
//! This module provides a stateful parser capable of handling partial frames
//! from a serial line. The parser accumulates bytes in an internal buffer and
//! cuts a token every time the end marker arrives.
//!
//! # Protocol Framing
//!
//! Reader frames are delimited by control bytes:
//! - Start byte (STX): `0x02`
//! - End byte (ETX): `0x03`
//!
//! ```text
//! STX  <token>  ETX
//! 0x02 A1B2C3   0x03
//! ```
//!
//! Everything received up to and including ETX belongs to one read. The
//! token is that read with every STX and ETX byte removed, so stray markers
//! left over from a glitched frame never end up in a token.
//!
//! # Usage
//!
//! ```
//! use latchkey_protocol::StreamParser;
//!
//! let mut parser = StreamParser::new();
//!
//! // Serial reads rarely line up with frames
//! parser.feed(&[0x02, b'A', b'1']);
//! parser.feed(b"B2C3");
//! parser.feed(&[0x03]);
//!
//! let token = parser.next_token().unwrap();
//! assert_eq!(token.as_str(), "A1B2C3");
//! ```

use bytes::{Buf, BytesMut};
use latchkey_core::Token;
use latchkey_core::constants::{END_BYTE, MAX_FRAME_SIZE, START_BYTE};
use std::collections::VecDeque;

/// Initial buffer capacity for incoming serial data.
const INITIAL_BUFFER_CAPACITY: usize = 256;

/// Initial payload capacity for frame assembly.
///
/// Reader tokens are short; this covers them without reallocation.
const INITIAL_PAYLOAD_CAPACITY: usize = 64;

/// Recommended initial capacity for the token queue.
const INITIAL_TOKEN_QUEUE_CAPACITY: usize = 4;

/// State machine states for parsing reader frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    /// No STX seen since the last ETX.
    ///
    /// Bytes received in this state are still part of the current read;
    /// they are kept and surface in the token if ETX follows.
    WaitingStart,

    /// STX seen, accumulating bytes until ETX.
    ReadingPayload,

    /// The current read outgrew `MAX_FRAME_SIZE`.
    ///
    /// Everything up to and including the next ETX is dropped without
    /// producing a token.
    Discarding,
}

/// Stateful stream parser for reader frames.
///
/// # State Machine
///
/// ```text
/// ┌─────────────┐  STX byte    ┌───────────────┐  ETX byte   ┌─────────────┐
/// │WaitingStart │─────────────>│ReadingPayload │────────────>│Token ready  │
/// └─────────────┘              └───────────────┘             └─────────────┘
///    ^  ^  │                          │                              │
///    │  │  │ ETX byte                 │ Payload > MAX_FRAME_SIZE     │
///    │  │  │ (token from noise)       v                              │
///    │  │  └─────────────────  ┌───────────────┐                     │
///    │  │       ETX byte       │  Discarding   │                     │
///    │  └──────────────────────│  (no token)   │                     │
///    │                         └───────────────┘                     │
///    └───────────────────────────────────────────────────────────────┘
/// ```
///
/// # Example
///
/// ```
/// use latchkey_protocol::{ParserState, StreamParser};
///
/// let mut parser = StreamParser::new();
///
/// parser.feed(&[0x02, b'0', b'1']);
/// assert_eq!(parser.state(), ParserState::ReadingPayload);
/// assert!(parser.next_token().is_none());
///
/// parser.feed(&[b'2', 0x03]);
/// assert_eq!(parser.next_token().unwrap().as_str(), "012");
/// ```
#[derive(Debug)]
pub struct StreamParser {
    /// Bytes received but not yet scanned for ETX.
    buffer: BytesMut,

    /// Current state of the parser state machine.
    state: ParserState,

    /// Bytes of the current read, markers included.
    payload: Vec<u8>,

    /// Tokens ready for extraction.
    tokens: VecDeque<Token>,
}

impl StreamParser {
    /// Create a new stream parser.
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            state: ParserState::WaitingStart,
            payload: Vec::with_capacity(INITIAL_PAYLOAD_CAPACITY),
            tokens: VecDeque::with_capacity(INITIAL_TOKEN_QUEUE_CAPACITY),
        }
    }

    /// Feed bytes read from the serial line into the parser.
    ///
    /// Any number of tokens may be completed by a single call.
    pub fn feed(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);

        while self.try_extract_token() {}
    }

    /// Extract the next complete token, if any.
    pub fn next_token(&mut self) -> Option<Token> {
        self.tokens.pop_front()
    }

    /// Returns current parser state.
    ///
    /// # Example
    ///
    /// ```
    /// use latchkey_protocol::{ParserState, StreamParser};
    ///
    /// let parser = StreamParser::new();
    /// assert_eq!(parser.state(), ParserState::WaitingStart);
    /// ```
    pub fn state(&self) -> ParserState {
        self.state
    }

    /// Returns number of tokens ready for extraction.
    pub fn tokens_available(&self) -> usize {
        self.tokens.len()
    }

    /// Number of bytes held for the unfinished read.
    pub fn pending_bytes(&self) -> usize {
        self.payload.len() + self.buffer.len()
    }

    /// Clear all internal buffers and reset state.
    ///
    /// # Example
    ///
    /// ```
    /// use latchkey_protocol::{ParserState, StreamParser};
    ///
    /// let mut parser = StreamParser::new();
    /// parser.feed(&[0x02, b'0', b'1']);
    /// parser.clear();
    ///
    /// assert_eq!(parser.state(), ParserState::WaitingStart);
    /// assert_eq!(parser.pending_bytes(), 0);
    /// ```
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.payload.clear();
        self.tokens.clear();
        self.state = ParserState::WaitingStart;
    }

    /// Returns an iterator that drains all currently available tokens.
    ///
    /// # Example
    ///
    /// ```
    /// use latchkey_protocol::StreamParser;
    ///
    /// let mut parser = StreamParser::new();
    /// parser.feed(b"\x02AAAA\x03\x02BBBB\x03");
    ///
    /// let tokens: Vec<_> = parser.drain_tokens().collect();
    /// assert_eq!(tokens.len(), 2);
    /// assert_eq!(parser.tokens_available(), 0);
    /// ```
    pub fn drain_tokens(&mut self) -> DrainTokens<'_> {
        DrainTokens { parser: self }
    }

    /// Consume the buffer up to the next ETX.
    ///
    /// Returns `true` if an ETX was consumed, whether or not it produced a
    /// token.
    fn try_extract_token(&mut self) -> bool {
        match self.buffer.iter().position(|&b| b == END_BYTE) {
            Some(etx_pos) => {
                let read = self.buffer.split_to(etx_pos);
                self.buffer.advance(1); // ETX

                let oversized = self.payload.len() + read.len() > MAX_FRAME_SIZE;
                if self.state != ParserState::Discarding && !oversized {
                    self.payload.extend_from_slice(&read);
                    self.enqueue_token_from_payload();
                }
                self.reset_for_next_frame();
                true
            }
            None => {
                self.accumulate_available_bytes();
                false
            }
        }
    }

    /// Strip markers from the current read and queue the result.
    fn enqueue_token_from_payload(&mut self) {
        let content: Vec<u8> = self
            .payload
            .iter()
            .copied()
            .filter(|&b| b != START_BYTE && b != END_BYTE)
            .collect();
        let token = Token::new(String::from_utf8_lossy(&content).into_owned());
        self.tokens.push_back(token);
    }

    fn reset_for_next_frame(&mut self) {
        self.state = ParserState::WaitingStart;
        self.payload.clear();
    }

    /// Move scanned bytes into the payload while ETX is still missing.
    ///
    /// A read that outgrows `MAX_FRAME_SIZE` switches the parser to
    /// [`ParserState::Discarding`]; the reader is producing garbage and
    /// nothing up to the next ETX can become a token.
    fn accumulate_available_bytes(&mut self) {
        if self.buffer.is_empty() {
            return;
        }

        if self.state == ParserState::Discarding {
            self.buffer.clear();
            return;
        }

        if self.buffer.contains(&START_BYTE) {
            self.state = ParserState::ReadingPayload;
        }
        self.payload.extend_from_slice(&self.buffer);
        self.buffer.clear();

        if self.payload.len() > MAX_FRAME_SIZE {
            self.payload.clear();
            self.state = ParserState::Discarding;
        }
    }
}

impl Default for StreamParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator that drains tokens from a [`StreamParser`].
///
/// Created by [`StreamParser::drain_tokens`].
pub struct DrainTokens<'a> {
    parser: &'a mut StreamParser,
}

impl<'a> Iterator for DrainTokens<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        self.parser.next_token()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.parser.tokens_available();
        (len, Some(len))
    }
}

impl<'a> ExactSizeIterator for DrainTokens<'a> {
    fn len(&self) -> usize {
        self.parser.tokens_available()
    }
}

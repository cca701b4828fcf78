//! Wire protocol of the serial RFID reader.
//!
//! The reader sends each scanned tag as `STX <token> ETX`. This crate turns
//! that byte stream into [`Token`](latchkey_core::Token)s and decides whether
//! a token is a real scan or reader noise.

pub mod framer;
pub mod stream_parser;
pub mod validation;

pub use framer::TokenFramer;
pub use stream_parser::{DrainTokens, ParserState, StreamParser};
pub use validation::is_valid_token;

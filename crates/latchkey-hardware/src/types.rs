//! Common types shared across hardware device implementations.

use chrono::{DateTime, Utc};
use latchkey_core::Token;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Logic level of a digital output line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineLevel {
    /// Inactive (0 V).
    Low,

    /// Active (3.3 V).
    High,
}

impl LineLevel {
    /// Check whether the line is driven active.
    pub fn is_high(&self) -> bool {
        matches!(self, Self::High)
    }
}

impl fmt::Display for LineLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::High => write!(f, "high"),
        }
    }
}

/// Logical purpose of an output line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineRole {
    /// Releases the door strike while high.
    Open,

    /// Reserved for a relock signal; configured but never driven.
    Close,
}

impl fmt::Display for LineRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Close => write!(f, "close"),
        }
    }
}

/// A token read from the serial reader.
///
/// Carries the wall-clock time the frame was completed, for logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRead {
    /// The framed token.
    pub token: Token,

    /// When the frame was completed.
    pub received_at: DateTime<Utc>,
}

impl TokenRead {
    /// Stamp `token` with the current time.
    pub fn now(token: Token) -> Self {
        Self::at(token, Utc::now())
    }

    /// Stamp `token` with an explicit time (replay and tests).
    pub fn at(token: Token, received_at: DateTime<Utc>) -> Self {
        Self { token, received_at }
    }
}

//! Mock device implementations for testing and development.
//!
//! This module provides simulated devices that can be inspected
//! programmatically without requiring physical hardware.

pub mod line;

pub use line::{LineTransition, MockLine, MockLineHandle};

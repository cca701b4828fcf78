//! Mock output line for testing and development.
//!
//! The line records every level change with a monotonic timestamp so tests
//! can assert both the order of transitions and the pulse length.

use crate::{Result, traits::OutputLine, types::LineLevel};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::time::Instant;

/// A recorded level change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineTransition {
    /// Level the line was driven to.
    pub level: LineLevel,

    /// When the write happened.
    pub at: Instant,
}

#[derive(Debug)]
struct LineState {
    level: LineLevel,
    transitions: Vec<LineTransition>,
    fail_writes: bool,
}

/// Mock output line.
///
/// # Examples
///
/// ```
/// use latchkey_hardware::mock::MockLine;
/// use latchkey_hardware::traits::OutputLine;
/// use latchkey_hardware::types::LineLevel;
///
/// let (mut line, handle) = MockLine::new();
/// line.set_high().unwrap();
/// line.set_low().unwrap();
///
/// let levels: Vec<_> = handle.transitions().iter().map(|t| t.level).collect();
/// assert_eq!(levels, vec![LineLevel::High, LineLevel::Low]);
/// ```
#[derive(Debug)]
pub struct MockLine {
    state: Arc<Mutex<LineState>>,
}

impl MockLine {
    /// Create a mock line starting low, with its inspection handle.
    pub fn new() -> (Self, MockLineHandle) {
        let state = Arc::new(Mutex::new(LineState {
            level: LineLevel::Low,
            transitions: Vec::new(),
            fail_writes: false,
        }));

        let line = Self {
            state: Arc::clone(&state),
        };
        let handle = MockLineHandle { state };

        (line, handle)
    }
}

impl OutputLine for MockLine {
    fn set_level(&mut self, level: LineLevel) -> Result<()> {
        let mut state = lock(&self.state);
        if state.fail_writes {
            return Err(crate::HardwareError::communication("mock line write failed"));
        }

        state.level = level;
        state.transitions.push(LineTransition {
            level,
            at: Instant::now(),
        });
        Ok(())
    }

    fn level(&self) -> LineLevel {
        lock(&self.state).level
    }
}

/// Handle for inspecting a [`MockLine`] after it has been moved into an
/// actuator.
#[derive(Debug, Clone)]
pub struct MockLineHandle {
    state: Arc<Mutex<LineState>>,
}

impl MockLineHandle {
    /// Current level of the line.
    pub fn level(&self) -> LineLevel {
        lock(&self.state).level
    }

    /// Every write so far, oldest first.
    pub fn transitions(&self) -> Vec<LineTransition> {
        lock(&self.state).transitions.clone()
    }

    /// Number of times the line was driven high.
    pub fn pulse_count(&self) -> usize {
        lock(&self.state)
            .transitions
            .iter()
            .filter(|t| t.level.is_high())
            .count()
    }

    /// Make subsequent writes fail, simulating a lost GPIO chip.
    pub fn fail_writes(&self, fail: bool) {
        lock(&self.state).fail_writes = fail;
    }
}

fn lock(state: &Mutex<LineState>) -> MutexGuard<'_, LineState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

//! Door access loop.
//!
//! The orchestrator consumes [`DoorEvent`]s one at a time and runs every
//! token through the same pipeline:
//!
//! ```text
//!          ┌──────┐  token   ┌───────────┐  window open   ┌──────────┐
//!  ───────►│ Idle │─────────►│ Debounce  │───────────────►│ LookedUp │
//!          └──────┘          └─────┬─────┘                └────┬─────┘
//!             ▲                    │ too soon          hit     │     miss
//!             │                    ▼                  ┌────────┴────────┐
//!             │              ┌───────────┐            ▼                 ▼
//!             ├──────────────│ Debounced │      ┌────────────┐   ┌──────────────┐
//!             │              └───────────┘      │ Authorized │   │ Unauthorized │
//!             │                                 └─────┬──────┘   └──────┬───────┘
//!             └───────────────────────────────────────┴─────────────────┘
//! ```
//!
//! An authorized token records the trigger time and then pulses the door.
//! The pulse is awaited inside the loop, so reads that arrive meanwhile
//! wait in the channel. An unauthorized token is reported only when it is a
//! real scan; sentinel reads are dropped silently.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use latchkey_access::AuthorizationTable;
//! use latchkey_core::Token;
//! use latchkey_daemon::orchestrator::{AccessDecision, Orchestrator};
//! use latchkey_hardware::{DoorActuator, MockLine};
//!
//! # #[tokio::main(flavor = "current_thread", start_paused = true)]
//! # async fn main() -> latchkey_daemon::Result<()> {
//! let table = Arc::new(AuthorizationTable::from_contents("A1B2C3 Alice\n"));
//! let (open, handle) = MockLine::new();
//! let (close, _) = MockLine::new();
//! let actuator = DoorActuator::new(open, close)?;
//!
//! let mut orchestrator = Orchestrator::new(table, actuator, std::time::Duration::from_secs(5));
//! let decision = orchestrator.handle_token(&Token::new("A1B2C3")).await?;
//!
//! assert!(matches!(decision, AccessDecision::Granted { .. }));
//! assert_eq!(handle.pulse_count(), 1);
//! # Ok(())
//! # }
//! ```

use std::convert::Infallible;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use latchkey_access::AuthorizationTable;
use latchkey_core::{Identity, Token};
use latchkey_hardware::{AnyOutputLine, DoorActuator, OutputLine};
use latchkey_protocol::is_valid_token;
use serde::Serialize;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::Instant;
use tracing::{debug, error, info, trace, warn};

use crate::debounce::DebounceGate;
use crate::error::{DaemonError, Result};
use crate::events::DoorEvent;

/// Pipeline stage of the token currently being handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DoorState {
    /// Waiting for the next event.
    Idle,

    /// Rejected by the cool-down window.
    Debounced,

    /// Passed the cool-down window and looked up in the table.
    LookedUp,

    /// Found in the table; the door is being pulsed.
    Authorized,

    /// Not in the table.
    Unauthorized,
}

impl DoorState {
    /// Check whether moving to `target` follows the pipeline.
    pub fn can_transition_to(&self, target: &DoorState) -> bool {
        matches!(
            (self, target),
            (DoorState::Idle, DoorState::Debounced | DoorState::LookedUp)
                | (DoorState::LookedUp, DoorState::Authorized | DoorState::Unauthorized)
                | (
                    DoorState::Debounced | DoorState::Authorized | DoorState::Unauthorized,
                    DoorState::Idle
                )
        )
    }
}

impl fmt::Display for DoorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DoorState::Idle => "Idle",
            DoorState::Debounced => "Debounced",
            DoorState::LookedUp => "LookedUp",
            DoorState::Authorized => "Authorized",
            DoorState::Unauthorized => "Unauthorized",
        };
        write!(f, "{name}")
    }
}

/// What happened to a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum AccessDecision {
    /// Inside the cool-down window. The table was not consulted.
    Debounced,

    /// Registered; the door was pulsed.
    Granted { identity: Identity },

    /// A real scan with no registered identity.
    Denied { token: Token },

    /// A sentinel read with no registered identity.
    Ignored,
}

/// Counters over the life of the loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OrchestratorStats {
    /// Tokens received from the reader.
    pub reads: u64,

    /// Tokens rejected by the cool-down window.
    pub debounced: u64,

    /// Unlocks performed.
    pub granted: u64,

    /// Real scans with no registered identity.
    pub denied: u64,

    /// Sentinel reads dropped.
    pub ignored: u64,

    /// Successful table reloads.
    pub reloads: u64,

    /// Failed table reloads.
    pub reload_failures: u64,
}

/// Runs the door access pipeline.
#[derive(Debug)]
pub struct Orchestrator<L = AnyOutputLine> {
    table: Arc<AuthorizationTable>,
    actuator: DoorActuator<L>,
    gate: DebounceGate,
    state: DoorState,
    stats: OrchestratorStats,
}

impl<L: OutputLine> Orchestrator<L> {
    /// Create an orchestrator reading from `table` and driving `actuator`,
    /// with `window` between unlocks.
    pub fn new(table: Arc<AuthorizationTable>, actuator: DoorActuator<L>, window: Duration) -> Self {
        Self {
            table,
            actuator,
            gate: DebounceGate::new(window),
            state: DoorState::Idle,
            stats: OrchestratorStats::default(),
        }
    }

    pub fn state(&self) -> DoorState {
        self.state
    }

    pub fn stats(&self) -> OrchestratorStats {
        self.stats
    }

    /// When the door was last unlocked.
    pub fn last_trigger(&self) -> Option<Instant> {
        self.gate.last_trigger()
    }

    pub fn table(&self) -> &Arc<AuthorizationTable> {
        &self.table
    }

    /// Consume events until a fatal one arrives.
    ///
    /// Never returns `Ok`.
    ///
    /// # Errors
    ///
    /// Returns [`DaemonError::Stream`] when the reader fails,
    /// [`DaemonError::Actuator`] when the door cannot be driven, and
    /// [`DaemonError::EventChannelClosed`] when every producer is gone.
    pub async fn run(&mut self, mut events: UnboundedReceiver<DoorEvent>) -> Result<Infallible> {
        while let Some(event) = events.recv().await {
            self.handle_event(event).await?;
        }

        error!("All event producers stopped");
        Err(DaemonError::EventChannelClosed)
    }

    /// Handle one event.
    ///
    /// Returns the access decision for token reads and `None` for
    /// bookkeeping events.
    ///
    /// # Errors
    ///
    /// Returns an error for a reader failure or an actuator failure.
    pub async fn handle_event(&mut self, event: DoorEvent) -> Result<Option<AccessDecision>> {
        match event {
            DoorEvent::TokenRead(read) => {
                trace!(received_at = %read.received_at, "Token event");
                self.handle_token(&read.token).await.map(Some)
            }
            DoorEvent::ReaderFailed { device, error } => {
                error!(device = %device, "Reader stream failed: {}", error);
                Err(DaemonError::stream(device, error))
            }
            DoorEvent::TableReloaded { entries } => {
                self.stats.reloads += 1;
                debug!(entries, "Now using reloaded authorization table");
                Ok(None)
            }
            DoorEvent::ReloadFailed { error } => {
                self.stats.reload_failures += 1;
                debug!("Still using previous authorization table after: {}", error);
                Ok(None)
            }
        }
    }

    /// Run one token through the pipeline.
    ///
    /// An authorized token holds the caller for the whole unlock pulse.
    ///
    /// # Errors
    ///
    /// Returns [`DaemonError::Actuator`] if the door outputs fail.
    pub async fn handle_token(&mut self, token: &Token) -> Result<AccessDecision> {
        self.stats.reads += 1;
        info!(token = %token, "Read token");

        let now = Instant::now();
        if !self.gate.check(now) {
            self.transition(DoorState::Debounced);
            self.stats.debounced += 1;
            warn!(token = %token, "Triggered too fast, skipping unlock");
            self.transition(DoorState::Idle);
            return Ok(AccessDecision::Debounced);
        }

        self.transition(DoorState::LookedUp);
        let decision = match self.table.lookup(token) {
            Some(identity) => {
                self.transition(DoorState::Authorized);
                info!(identity = %identity, token = %token, "Found valid token, unlocking door");

                self.gate.record(now);
                let pulsed = self.actuator.unlock().await;
                self.transition(DoorState::Idle);
                pulsed?;

                self.stats.granted += 1;
                AccessDecision::Granted { identity }
            }
            None => {
                self.transition(DoorState::Unauthorized);
                let decision = if is_valid_token(token) {
                    self.stats.denied += 1;
                    warn!(token = %token, "No identity registered for token");
                    AccessDecision::Denied {
                        token: token.clone(),
                    }
                } else {
                    self.stats.ignored += 1;
                    debug!(token = %token, "Ignoring sentinel read");
                    AccessDecision::Ignored
                };
                self.transition(DoorState::Idle);
                decision
            }
        };

        Ok(decision)
    }

    fn transition(&mut self, to: DoorState) {
        debug_assert!(
            self.state.can_transition_to(&to),
            "invalid transition {} -> {}",
            self.state,
            to
        );
        trace!(from = %self.state, to = %to, "Door state");
        self.state = to;
    }
}

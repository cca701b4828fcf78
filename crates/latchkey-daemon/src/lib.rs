//! latchkey door access daemon.
//!
//! Reads tokens from an RFID reader, checks them against a hot-reloaded
//! authorization file, and pulses the door strike for registered cards.
//!
//! The binary is a thin wrapper over [`daemon::run`]; everything it wires
//! together is public so the loop can be driven with mock hardware.

pub mod config;
pub mod daemon;
pub mod debounce;
pub mod error;
pub mod events;
pub mod logging;
pub mod orchestrator;

pub use config::DaemonConfig;
pub use debounce::DebounceGate;
pub use error::{DaemonError, Result, StartupStage};
pub use events::DoorEvent;
pub use orchestrator::{AccessDecision, DoorState, Orchestrator, OrchestratorStats};

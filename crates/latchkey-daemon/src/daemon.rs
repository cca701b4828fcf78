//! Startup sequence.
//!
//! Resources are acquired in a fixed order: GPIO lines, authorization
//! table, file watch, serial reader. A failure at any step aborts startup
//! with the step named in the error.

use std::convert::Infallible;
use std::sync::Arc;

use latchkey_access::{AuthorizationTable, TableWatcher};
use latchkey_core::VERSION;
use latchkey_hardware::{AnyOutputLine, DoorActuator, OutputLine, open_serial, spawn_reader};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::config::DaemonConfig;
use crate::error::{DaemonError, Result, StartupStage};
use crate::events::DoorEvent;
use crate::orchestrator::Orchestrator;

/// Start the daemon and run until a fatal error.
///
/// Must be called from within a Tokio runtime.
///
/// # Errors
///
/// Returns [`DaemonError::Startup`] if a resource cannot be acquired, and
/// whatever fatal error later stops the orchestrator.
pub async fn run(config: &DaemonConfig) -> Result<Infallible> {
    info!(version = VERSION, "Starting latchkey");

    let actuator = acquire_actuator()?;
    run_with(config, actuator).await
}

/// Run the remaining startup steps and the event loop with an already
/// acquired door actuator.
///
/// # Errors
///
/// Returns [`DaemonError::Startup`] naming the table, watcher or serial
/// step that failed, and whatever fatal error later stops the
/// orchestrator.
pub async fn run_with<L: OutputLine>(
    config: &DaemonConfig,
    actuator: DoorActuator<L>,
) -> Result<Infallible> {
    let table = AuthorizationTable::open(&config.list)
        .map_err(|e| DaemonError::startup(StartupStage::AuthorizationTable, e))?;
    let table = Arc::new(table);
    info!(path = %config.list.display(), entries = table.len(), "Authorization table loaded");

    let (tx, rx) = mpsc::unbounded_channel::<DoorEvent>();

    let _watcher = TableWatcher::spawn(&config.list, Arc::clone(&table), tx.clone())
        .map_err(|e| DaemonError::startup(StartupStage::Watcher, e))?;

    let port = open_serial(&config.port)
        .map_err(|e| DaemonError::startup(StartupStage::SerialDevice, e))?;
    spawn_reader(port, config.port.clone(), tx)
        .map_err(|e| DaemonError::startup(StartupStage::SerialDevice, e))?;

    info!(
        port = %config.port,
        debounce = ?config.debounce_window(),
        "Initialized"
    );

    let mut orchestrator = Orchestrator::new(table, actuator, config.debounce_window());
    orchestrator.run(rx).await
}

/// Acquire the door lines on BCM pins `OPEN_PIN` and `CLOSE_PIN`.
///
/// # Errors
///
/// Returns [`DaemonError::Startup`] at [`StartupStage::Gpio`] if either pin
/// cannot be claimed.
#[cfg(feature = "hardware-gpio")]
pub fn acquire_actuator() -> Result<DoorActuator<AnyOutputLine>> {
    use latchkey_core::constants::{CLOSE_PIN, OPEN_PIN};
    use latchkey_hardware::gpio::GpioLine;

    let gpio = |e| DaemonError::startup(StartupStage::Gpio, e);

    let open = GpioLine::acquire(OPEN_PIN).map_err(gpio)?;
    let close = GpioLine::acquire(CLOSE_PIN).map_err(gpio)?;
    debug!(open = OPEN_PIN, close = CLOSE_PIN, "Door lines acquired");

    DoorActuator::new(AnyOutputLine::Gpio(open), AnyOutputLine::Gpio(close)).map_err(gpio)
}

/// Build simulated door lines; this build has no GPIO backend.
#[cfg(not(feature = "hardware-gpio"))]
pub fn acquire_actuator() -> Result<DoorActuator<AnyOutputLine>> {
    use latchkey_hardware::MockLine;

    tracing::warn!("Built without GPIO support, door outputs are simulated");
    let (open, _) = MockLine::new();
    let (close, _) = MockLine::new();

    let actuator = DoorActuator::new(AnyOutputLine::Mock(open), AnyOutputLine::Mock(close))
        .map_err(|e| DaemonError::startup(StartupStage::Gpio, e))?;
    debug!("Simulated door lines ready");
    Ok(actuator)
}

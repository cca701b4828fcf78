//! Hot reload of the authorization file.
//!
//! The watcher observes the file's parent directory rather than the file
//! itself. Editors commonly save by writing a temporary file and renaming
//! it over the original, which replaces the inode a file-level watch would
//! be attached to. Directory events are filtered down to the one path.
//!
//! ```text
//! ┌──────────────┐  notify::Event  ┌──────────────┐  TableEvent  ┌────────────┐
//! │ notify       │────────────────►│ reload task  │─────────────►│ event loop │
//! │ (OS thread)  │   (unbounded)   │ (tokio)      │              └────────────┘
//! └──────────────┘                 └──────┬───────┘
//!                                         │ ArcSwap::store
//!                                         ▼
//!                                 AuthorizationTable
//! ```
//!
//! A failed reload keeps the previous table. Backend errors are logged and
//! the watcher keeps running.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use latchkey_core::{Error, Result};
use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::table::AuthorizationTable;

/// Outcome of a reload, delivered to the daemon's event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEvent {
    /// The file was re-read and the new table published.
    Reloaded {
        /// Entry count of the new table.
        entries: usize,
    },

    /// The file could not be read. The previous table stays active.
    ReloadFailed {
        /// Error message.
        error: String,
    },
}

/// Watches the authorization file and reloads the table on every write.
///
/// Dropping the watcher stops both the OS watch and the reload task.
pub struct TableWatcher {
    path: PathBuf,
    _watcher: RecommendedWatcher,
    task: JoinHandle<()>,
}

impl TableWatcher {
    /// Start watching `path`, reloading into `table` and reporting each
    /// outcome on `tx`.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Watch`] if the path cannot be resolved or the
    /// directory watch cannot be installed.
    pub fn spawn<E>(
        path: impl AsRef<Path>,
        table: Arc<AuthorizationTable>,
        tx: mpsc::UnboundedSender<E>,
    ) -> Result<Self>
    where
        E: From<TableEvent> + Send + 'static,
    {
        let path = std::path::absolute(path.as_ref())
            .map_err(|e| Error::Watch(format!("cannot resolve {}: {e}", path.as_ref().display())))?;
        let dir = path
            .parent()
            .ok_or_else(|| Error::Watch(format!("{} has no parent directory", path.display())))?
            .to_path_buf();

        let (raw_tx, raw_rx) = mpsc::unbounded_channel();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            // Receiver gone means the watcher is being torn down
            let _ = raw_tx.send(res);
        })
        .map_err(|e| Error::Watch(e.to_string()))?;

        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(|e| Error::Watch(format!("{}: {e}", dir.display())))?;

        debug!(path = %path.display(), dir = %dir.display(), "Watching authorization file");

        let task = tokio::spawn(reload_loop(path.clone(), table, raw_rx, tx));

        Ok(Self {
            path,
            _watcher: watcher,
            task,
        })
    }

    /// Absolute path being watched.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the reload task has stopped.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl std::fmt::Debug for TableWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableWatcher")
            .field("path", &self.path)
            .field("finished", &self.task.is_finished())
            .finish_non_exhaustive()
    }
}

impl Drop for TableWatcher {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn reload_loop<E>(
    path: PathBuf,
    table: Arc<AuthorizationTable>,
    mut raw_rx: mpsc::UnboundedReceiver<notify::Result<Event>>,
    tx: mpsc::UnboundedSender<E>,
) where
    E: From<TableEvent>,
{
    while let Some(res) = raw_rx.recv().await {
        let event = match res {
            Ok(event) => event,
            Err(e) => {
                warn!(path = %path.display(), "Watch error: {}", e);
                continue;
            }
        };

        if !is_write(&event.kind) || !lands_on(&event, &path) {
            continue;
        }

        info!(path = %path.display(), "Authorization file changed, reloading");
        let outcome = match table.reload(&path) {
            Ok(entries) => {
                info!(entries, "Authorization table reloaded");
                TableEvent::Reloaded { entries }
            }
            Err(e) => {
                error!("Reload failed, keeping previous table: {}", e);
                TableEvent::ReloadFailed {
                    error: e.to_string(),
                }
            }
        };

        if tx.send(E::from(outcome)).is_err() {
            debug!("Event channel closed, stopping reload task");
            return;
        }
    }
}

/// Whether `kind` changes the file's contents.
///
/// Data modification, creation, and a rename that lands on the name count.
/// Metadata changes, reads, and removal do not.
pub fn is_write(kind: &EventKind) -> bool {
    match kind {
        EventKind::Create(_) => true,
        EventKind::Modify(ModifyKind::Data(_) | ModifyKind::Any) => true,
        EventKind::Modify(ModifyKind::Name(RenameMode::To | RenameMode::Both)) => true,
        _ => false,
    }
}

/// Whether `event` leaves new contents at `path`.
///
/// A two-sided rename lists the source first and the destination last;
/// only the destination counts, so renaming the file away is not a write.
fn lands_on(event: &Event, path: &Path) -> bool {
    match event.kind {
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
            event.paths.last().is_some_and(|p| p == path)
        }
        _ => event.paths.iter().any(|p| p == path),
    }
}

//! Events consumed by the orchestrator loop.
//!
//! The reader thread and the table watcher both feed one channel. Their
//! relative order is not defined.

use latchkey_access::TableEvent;
use latchkey_hardware::{ReaderEvent, TokenRead};
use serde::Serialize;

/// Unified event from any producer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DoorEvent {
    /// A card was presented.
    TokenRead(TokenRead),

    /// The reader failed. Fatal.
    ReaderFailed { device: String, error: String },

    /// The authorization table was swapped.
    TableReloaded { entries: usize },

    /// The authorization file could not be re-read; the old table stays.
    ReloadFailed { error: String },
}

impl From<ReaderEvent> for DoorEvent {
    fn from(event: ReaderEvent) -> Self {
        match event {
            ReaderEvent::TokenRead(read) => Self::TokenRead(read),
            ReaderEvent::DeviceError { device, error } => Self::ReaderFailed { device, error },
        }
    }
}

impl From<TableEvent> for DoorEvent {
    fn from(event: TableEvent) -> Self {
        match event {
            TableEvent::Reloaded { entries } => Self::TableReloaded { entries },
            TableEvent::ReloadFailed { error } => Self::ReloadFailed { error },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use latchkey_core::Token;

    #[test]
    fn test_from_reader_event() {
        let read = TokenRead::now(Token::new("A1B2C3"));
        assert_eq!(
            DoorEvent::from(ReaderEvent::TokenRead(read.clone())),
            DoorEvent::TokenRead(read)
        );

        let failed = DoorEvent::from(ReaderEvent::DeviceError {
            device: "/dev/ttyUSB0".to_string(),
            error: "gone".to_string(),
        });
        assert!(matches!(failed, DoorEvent::ReaderFailed { .. }));
    }

    #[test]
    fn test_from_table_event() {
        assert_eq!(
            DoorEvent::from(TableEvent::Reloaded { entries: 3 }),
            DoorEvent::TableReloaded { entries: 3 }
        );
        assert!(matches!(
            DoorEvent::from(TableEvent::ReloadFailed {
                error: "denied".to_string()
            }),
            DoorEvent::ReloadFailed { .. }
        ));
    }

    #[test]
    fn test_serialization_is_tagged() {
        let json = serde_json::to_value(DoorEvent::TableReloaded { entries: 2 }).unwrap();
        assert_eq!(json["type"], "table_reloaded");
        assert_eq!(json["entries"], 2);
    }
}

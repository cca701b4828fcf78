//! Authorization table for the latchkey door daemon.
//!
//! The table maps card tokens to the person they belong to. It is loaded
//! from a plain text file, one `<token> <name...>` entry per line, and
//! reloaded whenever the file is written.
//!
//! - [`table::load`] parses the file.
//! - [`AuthorizationTable`] holds the current mapping behind an atomic
//!   pointer so lookups never wait for a reload.
//! - [`TableWatcher`] watches the file and swaps in the new mapping.
//!
//! ```
//! use latchkey_access::AuthorizationTable;
//! use latchkey_core::Token;
//!
//! let table = AuthorizationTable::from_contents("A1B2C3 Jane Doe\n");
//! let identity = table.lookup(&Token::new("A1B2C3")).unwrap();
//! assert_eq!(identity.as_str(), "Jane Doe");
//! ```

pub mod table;
pub mod watcher;

pub use table::{AuthorizationTable, Entries, load, parse};
pub use watcher::{TableEvent, TableWatcher};

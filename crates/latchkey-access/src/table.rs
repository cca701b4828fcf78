//! Authorization file parsing and the live table.
//!
//! # File format
//!
//! Each line is split on whitespace. The first field is the token; the
//! remaining fields, joined by single spaces, are the identity. Lines with
//! fewer than two fields are skipped. When a token appears more than once
//! the last line wins.
//!
//! ```text
//! A1B2C3   Jane   Doe      ->  A1B2C3 => "Jane Doe"
//! D4E5F6 Bob               ->  D4E5F6 => "Bob"
//! LONELY                   ->  (skipped)
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use arc_swap::ArcSwap;
use latchkey_core::{Error, Identity, Result, Token};
use tracing::debug;

/// Token to identity mapping.
pub type Entries = HashMap<Token, Identity>;

/// Parse authorization file contents.
pub fn parse(contents: &str) -> Entries {
    let mut entries = Entries::new();

    for line in contents.lines() {
        let mut fields = line.split_whitespace();
        let (Some(token), Some(first)) = (fields.next(), fields.next()) else {
            continue;
        };

        let identity = Identity::from_words(std::iter::once(first).chain(fields));
        entries.insert(Token::new(token), identity);
    }

    entries
}

/// Read and parse the authorization file at `path`.
///
/// Invalid UTF-8 is replaced rather than rejected; a mangled name on one
/// line should not take the whole table down.
///
/// # Errors
///
/// Returns [`Error::AuthorizationFile`] if the file cannot be read.
pub fn load(path: impl AsRef<Path>) -> Result<Entries> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| Error::authorization_file(path, e))?;
    let entries = parse(&String::from_utf8_lossy(&bytes));

    debug!(path = %path.display(), entries = entries.len(), "Loaded authorization file");
    Ok(entries)
}

/// The live authorization table.
///
/// Readers take a snapshot with a single atomic load; reloads build a new
/// map and publish it with a single atomic store. A lookup sees either the
/// old table or the new one, never a mix.
#[derive(Debug)]
pub struct AuthorizationTable {
    entries: ArcSwap<Entries>,
}

impl AuthorizationTable {
    /// Load the table from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AuthorizationFile`] if the file cannot be read.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_entries(load(path)?))
    }

    /// Wrap an already built mapping.
    pub fn from_entries(entries: Entries) -> Self {
        Self {
            entries: ArcSwap::from_pointee(entries),
        }
    }

    /// Build a table from file contents held in memory.
    pub fn from_contents(contents: &str) -> Self {
        Self::from_entries(parse(contents))
    }

    /// Identity registered for `token`, if any.
    pub fn lookup(&self, token: &Token) -> Option<Identity> {
        self.entries.load().get(token).cloned()
    }

    /// Number of entries in the current table.
    pub fn len(&self) -> usize {
        self.entries.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.load().is_empty()
    }

    /// The current mapping. Later swaps do not affect the returned value.
    pub fn snapshot(&self) -> Arc<Entries> {
        self.entries.load_full()
    }

    /// Publish `entries` as the new table.
    pub fn replace(&self, entries: Entries) {
        self.entries.store(Arc::new(entries));
    }

    /// Re-read `path` and publish the result. Returns the new entry count.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AuthorizationFile`] if the file cannot be read. The
    /// current table is left untouched.
    pub fn reload(&self, path: impl AsRef<Path>) -> Result<usize> {
        let entries = load(path)?;
        let count = entries.len();
        self.replace(entries);
        Ok(count)
    }
}

impl Default for AuthorizationTable {
    fn default() -> Self {
        Self::from_entries(Entries::new())
    }
}

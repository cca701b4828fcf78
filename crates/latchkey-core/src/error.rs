use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Authorization errors
    #[error("Failed to read authorization file {}: {source}", .path.display())]
    AuthorizationFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Watch errors
    #[error("File watch error: {0}")]
    Watch(String),
}

impl Error {
    /// Create an authorization file error for `path`.
    pub fn authorization_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::AuthorizationFile {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

//! Storage errors

use thiserror::Error;

/// Errors that can occur while reading or writing claim files
#[derive(Error, Debug)]
pub enum StoreError {
    /// Filesystem failure
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Offending path
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// A line that is not a valid record
    #[error("Malformed record at line {line}: {source}")]
    Json {
        /// 1-based line number
        line: usize,
        /// Parse error
        #[source]
        source: serde_json::Error,
    },

    /// Claim file or claim id does not exist
    #[error("Not found: {0}")]
    NotFound(String),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}

//! Error types for the Extractor

use crossspec_domain::{ArtifactType, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors that can occur during extraction
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// File bytes are not valid text
    #[error("Decode error in {path}: {reason}")]
    Decode {
        /// Offending file
        path: String,
        /// What was wrong with the bytes
        reason: String,
    },

    /// File exceeds the configured size cap
    #[error("File too large: {path} ({size} bytes, max: {max})")]
    SizeLimitExceeded {
        /// Offending file
        path: String,
        /// File size in bytes
        size: u64,
        /// Configured maximum
        max: u64,
    },

    /// Filesystem error
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path being accessed
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Claim finalization failed
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Include or exclude pattern did not compile
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] globset::Error),

    /// Malformed NDJSON record
    #[error("JSON parse error at line {line}: {source}")]
    Json {
        /// 1-based line number
        line: usize,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },

    /// No extractor registered for an artifact type
    #[error("No extractor registered for artifact type: {0}")]
    Unsupported(ArtifactType),
}

impl ExtractorError {
    /// Wrap an I/O error with the path it concerns
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        ExtractorError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Classification of a non-fatal, per-file problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// File skipped: unreadable bytes
    Decode,
    /// File skipped: over the size cap
    SizeLimitExceeded,
    /// Unit closed at end of file; still emitted
    PartialUnit,
    /// One claim rejected
    Validation,
    /// File skipped: filesystem error
    Io,
}

impl DiagnosticKind {
    /// Get the kind name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::Decode => "decode",
            DiagnosticKind::SizeLimitExceeded => "size_limit_exceeded",
            DiagnosticKind::PartialUnit => "partial_unit",
            DiagnosticKind::Validation => "validation",
            DiagnosticKind::Io => "io",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recorded per-file problem; the run continues
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// File the problem concerns
    pub path: String,
    /// Problem class
    pub kind: DiagnosticKind,
    /// Human-readable detail
    pub message: String,
}

impl Diagnostic {
    /// Create a diagnostic
    pub fn new(path: impl Into<String>, kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind,
            message: message.into(),
        }
    }

    /// Record a file-level error
    pub fn from_error(path: impl Into<String>, error: &ExtractorError) -> Self {
        let kind = match error {
            ExtractorError::Decode { .. } => DiagnosticKind::Decode,
            ExtractorError::SizeLimitExceeded { .. } => DiagnosticKind::SizeLimitExceeded,
            ExtractorError::Validation(_) => DiagnosticKind::Validation,
            _ => DiagnosticKind::Io,
        };
        Self::new(path, kind, error.to_string())
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.path, self.kind, self.message)
    }
}

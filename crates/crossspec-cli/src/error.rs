//! Error types for the CLI application.

use crossspec_domain::ValidationError;
use crossspec_extractor::ExtractorError;
use crossspec_store::StoreError;
use crossspec_trace::TraceError;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Extraction error
    #[error("Extraction error: {0}")]
    Extractor(#[from] ExtractorError),

    /// Claim file error
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Trace or plan error
    #[error("Trace error: {0}")]
    Trace(#[from] TraceError),

    /// Claim validation error
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// None of the claim files exist
    #[error("No claim files found. Run 'code-extract' or 'import' first.")]
    NoClaims,
}

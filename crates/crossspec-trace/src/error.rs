//! Trace error types

use thiserror::Error;

/// Errors that can occur during trace and plan operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TraceError {
    /// The query claim has neither facets nor usable text
    #[error("Claim {0} has no facets and no usable text")]
    InvalidQuery(String),

    /// Decomposition produced no fragments
    #[error("Requirement text yields no fragments")]
    EmptyRequirement,

    /// Unknown claim id
    #[error("Claim not found: {0}")]
    ClaimNotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

//! Claim validation errors

use thiserror::Error;

/// Errors raised while finalizing a single claim
///
/// Fatal to that claim only; extraction runs record them and continue.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// `text_raw` is empty or whitespace only
    #[error("Claim text is empty (source: {0})")]
    EmptyText(String),

    /// A required field is absent or blank
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Facets may only be attached once
    #[error("Claim {0} already carries facets")]
    FacetsAlreadySet(String),

    /// A claim identifier could not be parsed
    #[error("Invalid claim id: {0}")]
    InvalidClaimId(String),
}

//! Trait definitions for the seams between layers
//!
//! Extractors live in `crossspec-extractor`; claim lookup is implemented
//! by the index in `crossspec-store`.

use crate::{ArtifactType, Authority, Claim, ClaimId, ExtractedClaim, Facets, Status};
use std::path::Path;

/// Capability of turning one artifact into extracted claims
///
/// Implemented once per artifact type. Document extractors (pdf, xlsx,
/// pptx, eml) share this signature with the code extractor.
pub trait Extractor {
    /// Error type for extraction operations
    type Error;

    /// Artifact type this extractor handles
    fn artifact_type(&self) -> ArtifactType;

    /// Extract claims from the artifact at `path`
    fn extract(&self, path: &Path) -> Result<Vec<ExtractedClaim>, Self::Error>;
}

/// Read access to a set of finalized claims
pub trait ClaimLookup {
    /// Get a claim by id
    fn get_claim(&self, id: &ClaimId) -> Option<&Claim>;

    /// Iterate all claims in id order
    fn claims(&self) -> Box<dyn Iterator<Item = &Claim> + '_>;

    /// Number of claims
    fn claim_count(&self) -> usize;
}

/// Query criteria for retrieving claims
///
/// All set criteria must hold; facet criteria are ANDed across facets and
/// ORed within one facet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimQuery {
    /// Required facet tags
    pub facets: Facets,

    /// Filter by artifact type
    pub artifact_type: Option<ArtifactType>,

    /// Filter by authority
    pub authority: Option<Authority>,

    /// Filter by status
    pub status: Option<Status>,

    /// Free-text tokens that must all appear in the claim text
    pub text: Option<String>,

    /// Maximum results to return
    pub limit: Option<usize>,
}

impl ClaimQuery {
    /// Whether no criterion is set
    pub fn is_unconstrained(&self) -> bool {
        self.facets.is_empty()
            && self.artifact_type.is_none()
            && self.authority.is_none()
            && self.status.is_none()
            && self.text.as_deref().map_or(true, |t| t.trim().is_empty())
    }
}

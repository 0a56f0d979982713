//! Normalized extractor output, the input of claim finalization

use crate::{Authority, Facets, SourceInfo, Status};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An assertion as handed over by an extractor, before it has an identity
///
/// Document extractors (pages, slides, rows, mails) and the code scanner both
/// produce this shape; [`crate::Claim::build`] turns it into a [`crate::Claim`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedClaim {
    /// Verbatim text of the assertion
    pub text_raw: String,

    /// Where the text was found
    pub source: SourceInfo,

    /// Extraction method identifier
    pub method: String,

    /// Method-specific provenance details
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,

    /// Authority override; the run default applies when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authority: Option<Authority>,

    /// Status override; `active` applies when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,

    /// Facet hints supplied by the extractor
    #[serde(default, skip_serializing_if = "Facets::is_empty")]
    pub facets: Facets,
}

impl ExtractedClaim {
    /// Create an extracted claim with no overrides
    pub fn new(text_raw: impl Into<String>, source: SourceInfo, method: impl Into<String>) -> Self {
        Self {
            text_raw: text_raw.into(),
            source,
            method: method.into(),
            attributes: BTreeMap::new(),
            authority: None,
            status: None,
            facets: Facets::new(),
        }
    }

    /// Set the authority override
    pub fn with_authority(mut self, authority: Authority) -> Self {
        self.authority = Some(authority);
        self
    }

    /// Set the status override
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    /// Attach facet hints
    pub fn with_facets(mut self, facets: Facets) -> Self {
        self.facets = facets;
        self
    }

    /// Record a provenance attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

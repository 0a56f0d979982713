//! Per-run state shared by every claim built during one extraction

use crate::{Authority, ClaimIdGenerator, Status};
use chrono::{DateTime, Utc};

/// Tool identifier written into `extracted_by`
pub const TOOL_NAME: &str = "crossspec-extractor";

/// Context of one extraction run
///
/// Owns the id counter so that numbering is scoped to the run and the
/// clock so that every claim of the run carries the same timestamp.
/// The context is `Sync`; parallel workers borrow it.
#[derive(Debug)]
pub struct RunContext {
    ids: ClaimIdGenerator,
    default_authority: Option<Authority>,
    default_status: Status,
    tool_version: String,
    extracted_by: String,
    started_at: DateTime<Utc>,
}

impl RunContext {
    /// Create a context stamped with the current time
    pub fn new(ids: ClaimIdGenerator) -> Self {
        Self {
            ids,
            default_authority: None,
            default_status: Status::Active,
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            extracted_by: format!("{}@{}", TOOL_NAME, env!("CARGO_PKG_VERSION")),
            started_at: Utc::now(),
        }
    }

    /// Authority applied to claims that do not carry one
    pub fn with_default_authority(mut self, authority: Authority) -> Self {
        self.default_authority = Some(authority);
        self
    }

    /// Status applied to claims that do not carry one
    pub fn with_default_status(mut self, status: Status) -> Self {
        self.default_status = status;
        self
    }

    /// Override the tool version and `extracted_by` label
    pub fn with_tool(mut self, extracted_by: impl Into<String>, tool_version: impl Into<String>) -> Self {
        self.extracted_by = extracted_by.into();
        self.tool_version = tool_version.into();
        self
    }

    /// Pin the run timestamp
    pub fn with_clock(mut self, started_at: DateTime<Utc>) -> Self {
        self.started_at = started_at;
        self
    }

    /// Id allocator of this run
    pub fn ids(&self) -> &ClaimIdGenerator {
        &self.ids
    }

    /// Default authority, if any
    pub fn default_authority(&self) -> Option<Authority> {
        self.default_authority
    }

    /// Default status
    pub fn default_status(&self) -> Status {
        self.default_status
    }

    /// Tool version recorded in provenance
    pub fn tool_version(&self) -> &str {
        &self.tool_version
    }

    /// Tool label recorded in `extracted_by`
    pub fn extracted_by(&self) -> &str {
        &self.extracted_by
    }

    /// Timestamp shared by all claims of the run
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

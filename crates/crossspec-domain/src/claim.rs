//! Claim module - the immutable record of one extracted assertion

use crate::hashing::{hash_claim, normalize_light, HashInfo};
use crate::{
    ExtractedClaim, Facets, Provenance, RelationKind, Relations, RunContext, SourceInfo,
    ValidationError,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Schema version written into every claim
pub const SCHEMA_VERSION: u32 = 1;

/// Run-scoped claim identifier, e.g. `CLM-BRAKE-000042`
///
/// Unique within one extraction run only; re-running extraction may assign
/// a different id to the same text. Use [`Claim::hash`] for cross-run
/// identity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimId(String);

impl ClaimId {
    /// Compose an id from a namespace prefix and a sequence number
    pub fn compose(prefix: &str, sequence: u64) -> Self {
        Self(format!("CLM-{}-{:06}", prefix, sequence))
    }

    /// Wrap an already-formed id
    ///
    /// This is primarily for storage layer deserialization and lookups.
    pub fn from_string(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Parse a user-supplied id, rejecting blanks and embedded whitespace
    ///
    /// # Examples
    ///
    /// ```
    /// use crossspec_domain::ClaimId;
    ///
    /// let id = ClaimId::parse("CLM-GEN-000001").unwrap();
    /// assert_eq!(id.as_str(), "CLM-GEN-000001");
    /// assert!(ClaimId::parse("  ").is_err());
    /// ```
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
            return Err(ValidationError::InvalidClaimId(value.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Get the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClaimId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How binding a statement is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Authority {
    /// Binding requirement text
    Normative,
    /// Accepted interpretation of normative text
    ApprovedInterpretation,
    /// Background or descriptive material (default for code)
    Informative,
    /// Not yet reviewed
    Unverified,
}

impl Authority {
    /// Ordering weight used for tie-breaks: higher is more binding
    pub fn rank(&self) -> u8 {
        match self {
            Authority::Normative => 3,
            Authority::ApprovedInterpretation => 2,
            Authority::Informative => 1,
            Authority::Unverified => 0,
        }
    }

    /// Get the authority name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Authority::Normative => "normative",
            Authority::ApprovedInterpretation => "approved_interpretation",
            Authority::Informative => "informative",
            Authority::Unverified => "unverified",
        }
    }

    /// Parse an authority from a string (internal use)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "normative" => Some(Authority::Normative),
            "approved_interpretation" => Some(Authority::ApprovedInterpretation),
            "informative" => Some(Authority::Informative),
            "unverified" => Some(Authority::Unverified),
            _ => None,
        }
    }
}

impl fmt::Display for Authority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Authority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid authority: {}", s))
    }
}

/// Lifecycle state of a claim
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Current
    #[default]
    Active,
    /// Replaced by a newer claim
    Superseded,
    /// Withdrawn without replacement
    Retired,
}

impl Status {
    /// Get the status name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Active => "active",
            Status::Superseded => "superseded",
            Status::Retired => "retired",
        }
    }

    /// Parse a status from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "active" => Some(Status::Active),
            "superseded" => Some(Status::Superseded),
            "retired" => Some(Status::Retired),
            _ => None,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid status: {}", s))
    }
}

/// A claim - the single persisted unit
///
/// Claims are immutable once built: there are no setters, and operations
/// that "change" a claim ([`Claim::supersede`], [`Claim::with_facets`])
/// produce a new value. The hash is computed from `text_raw` and the
/// source identity before any normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    schema_version: u32,
    claim_id: ClaimId,
    authority: Authority,
    #[serde(default)]
    status: Status,
    text_raw: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text_norm: Option<String>,
    hash: HashInfo,
    source: SourceInfo,
    provenance: Provenance,
    created_at: DateTime<Utc>,
    extracted_by: String,
    #[serde(default, skip_serializing_if = "Facets::is_empty")]
    facets: Facets,
    #[serde(default, skip_serializing_if = "Relations::is_empty")]
    relations: Relations,
}

impl Claim {
    /// Finalize an extracted claim: validate, hash, normalize, assign an id
    ///
    /// The only side effect is advancing the run's id counter, and only
    /// once validation has passed.
    ///
    /// # Errors
    /// Returns [`ValidationError`] when the text is blank or a required
    /// field (source path, method, authority, tool version) is absent.
    pub fn build(extracted: ExtractedClaim, ctx: &RunContext) -> Result<Self, ValidationError> {
        if extracted.source.path.trim().is_empty() {
            return Err(ValidationError::MissingField("source.path"));
        }
        if extracted.text_raw.trim().is_empty() {
            return Err(ValidationError::EmptyText(extracted.source.path.clone()));
        }
        if extracted.method.trim().is_empty() {
            return Err(ValidationError::MissingField("provenance.method"));
        }
        if ctx.tool_version().trim().is_empty() {
            return Err(ValidationError::MissingField("provenance.tool_version"));
        }
        let authority = extracted
            .authority
            .or(ctx.default_authority())
            .ok_or(ValidationError::MissingField("authority"))?;

        let hash = hash_claim(&extracted.text_raw, &extracted.source);
        let text_norm = normalize_light(&extracted.text_raw);
        let claim_id = ctx.ids().next_id(&extracted);

        let provenance = Provenance::new(
            extracted.method,
            ctx.tool_version().to_string(),
            ctx.started_at(),
        )
        .with_attributes(extracted.attributes);

        Ok(Self {
            schema_version: SCHEMA_VERSION,
            claim_id,
            authority,
            status: extracted.status.unwrap_or(ctx.default_status()),
            text_raw: extracted.text_raw,
            text_norm: Some(text_norm),
            hash,
            source: extracted.source,
            provenance,
            created_at: ctx.started_at(),
            extracted_by: ctx.extracted_by().to_string(),
            facets: extracted.facets,
            relations: Relations::new(),
        })
    }

    /// Build the claim that replaces this one
    ///
    /// The new claim records `supersedes -> self`; this claim is untouched.
    pub fn supersede(
        &self,
        replacement: ExtractedClaim,
        ctx: &RunContext,
    ) -> Result<Claim, ValidationError> {
        let mut claim = Claim::build(replacement, ctx)?;
        claim.relations = claim
            .relations
            .with(RelationKind::Supersedes, self.claim_id.clone());
        Ok(claim)
    }

    /// Attach facets to a claim that arrived without any (write-once)
    ///
    /// # Errors
    /// Returns [`ValidationError::FacetsAlreadySet`] if facets are present.
    pub fn with_facets(mut self, facets: Facets) -> Result<Self, ValidationError> {
        if !self.facets.is_empty() {
            return Err(ValidationError::FacetsAlreadySet(self.claim_id.to_string()));
        }
        self.facets = facets;
        Ok(self)
    }

    /// Record a typed link to another claim (e.g. an accepted trace link)
    pub fn with_relation(mut self, kind: RelationKind, target: ClaimId) -> Self {
        self.relations = self.relations.with(kind, target);
        self
    }

    /// Recompute the digest and compare with the stored one
    pub fn verify_hash(&self) -> bool {
        hash_claim(&self.text_raw, &self.source) == self.hash
    }

    /// Whether the claim's own record is active
    ///
    /// A claim is never mutated once built, so supersession by a later claim
    /// is resolved by the index, which sees both ends of the link.
    pub fn is_authoritative(&self) -> bool {
        self.status == Status::Active
    }

    /// Schema version tag
    pub fn schema_version(&self) -> u32 {
        self.schema_version
    }

    /// Run-scoped identifier
    pub fn claim_id(&self) -> &ClaimId {
        &self.claim_id
    }

    /// Authority classification
    pub fn authority(&self) -> Authority {
        self.authority
    }

    /// Lifecycle status
    pub fn status(&self) -> Status {
        self.status
    }

    /// Verbatim source text
    pub fn text_raw(&self) -> &str {
        &self.text_raw
    }

    /// Normalized comparison text, if computed
    pub fn text_norm(&self) -> Option<&str> {
        self.text_norm.as_deref()
    }

    /// Text used for matching: normalized when available, raw otherwise
    pub fn match_text(&self) -> &str {
        self.text_norm.as_deref().unwrap_or(&self.text_raw)
    }

    /// Integrity digest
    pub fn hash(&self) -> &HashInfo {
        &self.hash
    }

    /// Source descriptor
    pub fn source(&self) -> &SourceInfo {
        &self.source
    }

    /// Extraction provenance
    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }

    /// Creation timestamp
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Extracting tool identifier
    pub fn extracted_by(&self) -> &str {
        &self.extracted_by
    }

    /// Facet tags
    pub fn facets(&self) -> &Facets {
        &self.facets
    }

    /// Links to other claims
    pub fn relations(&self) -> &Relations {
        &self.relations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ArtifactType, ClaimIdGenerator, IdPrefix, Locator, UnitKind};

    fn ctx() -> RunContext {
        RunContext::new(ClaimIdGenerator::new(IdPrefix::default()))
            .with_default_authority(Authority::Informative)
    }

    fn spec_text(text: &str) -> ExtractedClaim {
        ExtractedClaim::new(
            text,
            SourceInfo::new(ArtifactType::Pdf, "docs/brake_spec.pdf")
                .with_locator(Locator::Page { page: 4 }),
            "pdf:text_layer",
        )
    }

    #[test]
    fn test_build_assigns_identity() {
        let ctx = ctx();
        let claim = Claim::build(
            spec_text("The brake  shall\nengage.").with_authority(Authority::Normative),
            &ctx,
        )
        .unwrap();

        assert_eq!(claim.schema_version(), SCHEMA_VERSION);
        assert_eq!(claim.claim_id().as_str(), "CLM-GEN-000001");
        assert_eq!(claim.authority(), Authority::Normative);
        assert_eq!(claim.status(), Status::Active);
        assert_eq!(claim.text_raw(), "The brake  shall\nengage.");
        assert_eq!(claim.text_norm(), Some("The brake shall engage."));
        assert!(claim.verify_hash());
        assert!(claim.is_authoritative());
    }

    #[test]
    fn test_authority_follows_own_status() {
        let ctx = ctx();
        let replaced = Claim::build(spec_text("Brake within 200 ms."), &ctx)
            .unwrap()
            .with_relation(RelationKind::ReplacedBy, ClaimId::from_string("CLM-BRAKE-000009"));
        assert_eq!(replaced.status(), Status::Active);
        assert!(!replaced.relations().has(RelationKind::Supersedes));
        assert!(replaced.is_authoritative());

        let retired = Claim::build(spec_text("Brake within 300 ms.").with_status(Status::Retired), &ctx)
            .unwrap();
        assert!(!retired.is_authoritative());
    }

    #[test]
    fn test_hash_is_independent_of_run() {
        let a = Claim::build(spec_text("Brake pressure is limited."), &ctx()).unwrap();
        let other = ctx();
        other.ids().next_id(&spec_text("burn an id"));
        let b = Claim::build(spec_text("Brake pressure is limited."), &other).unwrap();

        assert_ne!(a.claim_id(), b.claim_id());
        assert_eq!(a.hash(), b.hash());
    }

    #[test]
    fn test_empty_text_rejected_without_consuming_id() {
        let ctx = ctx();
        let err = Claim::build(spec_text("  \n"), &ctx).unwrap_err();
        assert!(matches!(err, ValidationError::EmptyText(_)));
        assert_eq!(ctx.ids().issued(), 0);
    }

    #[test]
    fn test_missing_authority_rejected() {
        let ctx = RunContext::new(ClaimIdGenerator::default());
        let err = Claim::build(spec_text("Brake pressure is limited."), &ctx).unwrap_err();
        assert_eq!(err, ValidationError::MissingField("authority"));
    }

    #[test]
    fn test_missing_source_path_rejected() {
        let mut extracted = spec_text("Brake pressure is limited.");
        extracted.source.path = String::new();
        let err = Claim::build(extracted, &ctx()).unwrap_err();
        assert_eq!(err, ValidationError::MissingField("source.path"));
    }

    #[test]
    fn test_supersede_links_without_mutation() {
        let ctx = ctx();
        let old = Claim::build(spec_text("Limit is 10 bar."), &ctx).unwrap();
        let snapshot = old.clone();
        let new = old.supersede(spec_text("Limit is 12 bar."), &ctx).unwrap();

        assert_eq!(old, snapshot);
        let targets: Vec<_> = new.relations().targets(RelationKind::Supersedes).collect();
        assert_eq!(targets, vec![old.claim_id()]);
    }

    #[test]
    fn test_facets_are_write_once() {
        let claim = Claim::build(spec_text("Brake pressure is limited."), &ctx()).unwrap();
        let tagged = claim.with_facets(Facets::new().with("feature", "brake")).unwrap();
        let err = tagged
            .with_facets(Facets::new().with("feature", "timing"))
            .unwrap_err();
        assert!(matches!(err, ValidationError::FacetsAlreadySet(_)));
    }

    #[test]
    fn test_json_round_trip_preserves_hash() {
        let extracted = ExtractedClaim::new(
            "void brake_init(void) {}",
            SourceInfo::new(ArtifactType::Code, "src/brake.c").with_locator(Locator::Lines {
                unit: UnitKind::Function,
                line_start: 1,
                line_end: 1,
                byte_start: 0,
                byte_end: 24,
            }),
            "code_extract:c_like",
        )
        .with_facets(Facets::new().with("feature", "brake"));
        let claim = Claim::build(extracted, &ctx()).unwrap();

        let line = serde_json::to_string(&claim).unwrap();
        let parsed: Claim = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed, claim);
        assert!(parsed.verify_hash());
        assert!(!line.contains("relations"));
    }

    #[test]
    fn test_authority_rank_order() {
        assert!(Authority::Normative.rank() > Authority::ApprovedInterpretation.rank());
        assert!(Authority::ApprovedInterpretation.rank() > Authority::Informative.rank());
        assert_eq!(Authority::parse("approved-interpretation"), Some(Authority::ApprovedInterpretation));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::{ArtifactType, ClaimIdGenerator, IdPrefix};
    use proptest::prelude::*;

    proptest! {
        /// Property: the hash depends only on text and source, never on the run
        #[test]
        fn test_hash_stable_across_runs(text in "[a-zA-Z0-9 {}();\n]{1,80}", burn in 0u64..5) {
            prop_assume!(!text.trim().is_empty());
            let source = SourceInfo::new(ArtifactType::Code, "src/a.c");
            let first = RunContext::new(ClaimIdGenerator::new(IdPrefix::default()))
                .with_default_authority(Authority::Informative);
            let second = RunContext::new(ClaimIdGenerator::new(IdPrefix::default()))
                .with_default_authority(Authority::Informative);
            for _ in 0..burn {
                second.ids().next_id(&ExtractedClaim::new("x", source.clone(), "m"));
            }
            let a = Claim::build(ExtractedClaim::new(text.clone(), source.clone(), "m"), &first).unwrap();
            let b = Claim::build(ExtractedClaim::new(text, source, "m"), &second).unwrap();
            prop_assert_eq!(a.hash(), b.hash());
        }

        /// Property: composed ids preserve sequence order within a prefix
        #[test]
        fn test_claim_id_ordering(a in 1u64..999_999, b in 1u64..999_999) {
            let id_a = ClaimId::compose("GEN", a);
            let id_b = ClaimId::compose("GEN", b);
            prop_assert_eq!(id_a < id_b, a < b);
        }
    }
}

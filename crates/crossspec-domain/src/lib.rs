//! CrossSpec Domain Layer
//!
//! This crate holds the claim model shared by every other CrossSpec crate:
//! the value types, the deterministic hash and the id namespace rules.
//! It performs no I/O.
//!
//! ## Key Concepts
//!
//! - **Claim**: An immutable, attributable unit of text with a stable hash
//! - **Source**: Where the text came from (document page, sheet row, code unit)
//! - **Facets**: Multi-valued tags (`feature`, `component`, ...) used for lookup
//! - **Relations**: Typed links between claims (supersedes, traces_to, ...)
//! - **Run context**: Per-extraction id counter and clock
//!
//! ## Identity
//!
//! A `claim_id` is unique only within the run that assigned it. The
//! `hash` is stable across runs: it covers the raw text and the source
//! identity, never timestamps or ids.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod claim;
pub mod error;
pub mod extracted;
pub mod facets;
pub mod hashing;
pub mod namespace;
pub mod provenance;
pub mod relationship;
pub mod run;
pub mod source;
pub mod traits;

// Re-exports for convenience
pub use claim::{Authority, Claim, ClaimId, Status, SCHEMA_VERSION};
pub use error::ValidationError;
pub use extracted::ExtractedClaim;
pub use facets::Facets;
pub use hashing::{hash_claim, normalize_light, sha256_hex, HashInfo};
pub use namespace::{ClaimIdGenerator, IdPrefix};
pub use provenance::Provenance;
pub use relationship::{RelationKind, Relations};
pub use run::RunContext;
pub use source::{ArtifactType, Locator, SourceInfo, UnitKind};
pub use traits::{ClaimLookup, ClaimQuery, Extractor};

//! Claim id namespaces and the run-scoped sequence counter
//!
//! Identifiers look like `CLM-<PREFIX>-<NNNNNN>`. The prefix comes from a
//! configurable [`IdPrefix`] strategy; the number comes from a
//! [`ClaimIdGenerator`] owned by one extraction run. Nothing here is
//! process-global: two runs with two generators hand out overlapping ids.

use crate::{ClaimId, ExtractedClaim};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Prefix used when a strategy cannot derive one
pub const FALLBACK_PREFIX: &str = "GEN";

const MAX_FACET_PREFIX_LEN: usize = 6;

/// Strategy for choosing the namespace part of a claim id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum IdPrefix {
    /// Caller-declared namespace, used verbatim (sanitized)
    Namespace {
        /// Namespace prefix, e.g. "BRK"
        prefix: String,
    },

    /// First tag of a facet, upper-cased and truncated to six characters
    DominantFacet {
        /// Facet to read, usually "feature"
        facet: String,
        /// Prefix when the claim carries no tag under the facet
        fallback: String,
    },

    /// Source language of code claims (`PY`, `C`, `CPP`), artifact type otherwise
    Language,
}

impl Default for IdPrefix {
    fn default() -> Self {
        IdPrefix::DominantFacet {
            facet: crate::facets::FEATURE.to_string(),
            fallback: FALLBACK_PREFIX.to_string(),
        }
    }
}

impl IdPrefix {
    /// Resolve the prefix for one extracted claim
    pub fn resolve(&self, extracted: &ExtractedClaim) -> String {
        match self {
            IdPrefix::Namespace { prefix } => sanitize(prefix, usize::MAX, FALLBACK_PREFIX),
            IdPrefix::DominantFacet { facet, fallback } => extracted
                .facets
                .get(facet)
                .and_then(|values| values.iter().next())
                .map(|value| sanitize(value, MAX_FACET_PREFIX_LEN, fallback))
                .unwrap_or_else(|| sanitize(fallback, usize::MAX, FALLBACK_PREFIX)),
            IdPrefix::Language => match extracted.attributes.get("language").map(String::as_str) {
                Some("python") => "PY".to_string(),
                Some("c") => "C".to_string(),
                Some("cpp") => "CPP".to_string(),
                _ => extracted.source.artifact_type.as_str().to_uppercase(),
            },
        }
    }
}

/// Upper-case, map non-alphanumerics to `_`, truncate
fn sanitize(raw: &str, max_len: usize, fallback: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .take(max_len)
        .collect();
    if cleaned.is_empty() {
        fallback.to_string()
    } else {
        cleaned
    }
}

/// Run-scoped claim id allocator
///
/// The sequence is a single atomic counter shared by every prefix, so the
/// generator is `Sync` and can be borrowed by parallel workers. Sequence
/// numbers are unique within the run regardless of prefix.
#[derive(Debug, Default)]
pub struct ClaimIdGenerator {
    prefix: IdPrefix,
    sequence: AtomicU64,
}

impl ClaimIdGenerator {
    /// Create a generator with the given prefix strategy
    pub fn new(prefix: IdPrefix) -> Self {
        Self {
            prefix,
            sequence: AtomicU64::new(0),
        }
    }

    /// Allocate the next id for a claim
    pub fn next_id(&self, extracted: &ExtractedClaim) -> ClaimId {
        let prefix = self.prefix.resolve(extracted);
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        ClaimId::compose(&prefix, seq)
    }

    /// Number of ids handed out so far
    pub fn issued(&self) -> u64 {
        self.sequence.load(Ordering::Relaxed)
    }

    /// Prefix strategy in use
    pub fn prefix(&self) -> &IdPrefix {
        &self.prefix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ArtifactType, Facets, SourceInfo};
    use std::collections::BTreeMap;

    fn extracted(facets: Facets, language: Option<&str>) -> ExtractedClaim {
        let mut attributes = BTreeMap::new();
        if let Some(language) = language {
            attributes.insert("language".to_string(), language.to_string());
        }
        ExtractedClaim {
            text_raw: "text".to_string(),
            source: SourceInfo::new(ArtifactType::Code, "a.c"),
            method: "test".to_string(),
            attributes,
            authority: None,
            status: None,
            facets,
        }
    }

    #[test]
    fn test_dominant_facet_prefix() {
        let strategy = IdPrefix::default();
        let tagged = extracted(Facets::new().with("feature", "brake-by-wire"), None);
        assert_eq!(strategy.resolve(&tagged), "BRAKE_");
        assert_eq!(strategy.resolve(&extracted(Facets::new(), None)), "GEN");
    }

    #[test]
    fn test_namespace_prefix() {
        let strategy = IdPrefix::Namespace {
            prefix: "brk".to_string(),
        };
        assert_eq!(strategy.resolve(&extracted(Facets::new(), None)), "BRK");
    }

    #[test]
    fn test_language_prefix() {
        let strategy = IdPrefix::Language;
        assert_eq!(strategy.resolve(&extracted(Facets::new(), Some("python"))), "PY");
        assert_eq!(strategy.resolve(&extracted(Facets::new(), Some("cpp"))), "CPP");
        assert_eq!(strategy.resolve(&extracted(Facets::new(), None)), "CODE");
    }

    #[test]
    fn test_sequence_is_monotonic_across_prefixes() {
        let generator = ClaimIdGenerator::new(IdPrefix::default());
        let first = generator.next_id(&extracted(Facets::new(), None));
        let second = generator.next_id(&extracted(Facets::new().with("feature", "nvm"), None));
        assert_eq!(first.as_str(), "CLM-GEN-000001");
        assert_eq!(second.as_str(), "CLM-NVM-000002");
        assert_eq!(generator.issued(), 2);
    }

    #[test]
    fn test_generator_is_shared_across_threads() {
        let generator = ClaimIdGenerator::new(IdPrefix::Language);
        let claim = extracted(Facets::new(), Some("c"));
        let ids: Vec<ClaimId> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| (0..25).map(|_| generator.next_id(&claim)).collect::<Vec<_>>()))
                .collect();
            handles.into_iter().flat_map(|h| h.join().unwrap()).collect()
        });
        let unique: std::collections::BTreeSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), 100);
    }
}

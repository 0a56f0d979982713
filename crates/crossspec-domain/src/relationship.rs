//! Typed links between claims

use crate::ClaimId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Type of relationship between claims
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// This claim replaces the target (newer version)
    Supersedes,

    /// This claim was replaced by the target
    ReplacedBy,

    /// This claim was merged into the target
    MergedInto,

    /// This claim was split into the target
    SplitInto,

    /// Accepted trace link from a specification claim to an implementation claim
    TracesTo,
}

impl RelationKind {
    /// Get the relation name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationKind::Supersedes => "supersedes",
            RelationKind::ReplacedBy => "replaced_by",
            RelationKind::MergedInto => "merged_into",
            RelationKind::SplitInto => "split_into",
            RelationKind::TracesTo => "traces_to",
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of typed links from one claim to others
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Relations(BTreeMap<RelationKind, BTreeSet<ClaimId>>);

impl Relations {
    /// Create an empty relation set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a link
    pub fn with(mut self, kind: RelationKind, target: ClaimId) -> Self {
        self.0.entry(kind).or_default().insert(target);
        self
    }

    /// Targets of a relation kind
    pub fn targets(&self, kind: RelationKind) -> impl Iterator<Item = &ClaimId> {
        self.0.get(&kind).into_iter().flatten()
    }

    /// Whether any link of the given kind exists
    pub fn has(&self, kind: RelationKind) -> bool {
        self.0.get(&kind).is_some_and(|targets| !targets.is_empty())
    }

    /// Every link, grouped by kind in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (RelationKind, &ClaimId)> {
        self.0
            .iter()
            .flat_map(|(kind, targets)| targets.iter().map(move |target| (*kind, target)))
    }

    /// Whether there are no links at all
    pub fn is_empty(&self) -> bool {
        self.0.values().all(BTreeSet::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relations_serialize_by_kind() {
        let relations = Relations::new()
            .with(RelationKind::Supersedes, ClaimId::from_string("CLM-GEN-000001"));
        let json = serde_json::to_value(&relations).unwrap();
        assert_eq!(json["supersedes"][0], "CLM-GEN-000001");
        assert!(relations.has(RelationKind::Supersedes));
        assert!(!relations.has(RelationKind::TracesTo));
        let links: Vec<_> = relations.iter().map(|(k, t)| (k.as_str(), t.as_str())).collect();
        assert_eq!(links, vec![("supersedes", "CLM-GEN-000001")]);
    }
}

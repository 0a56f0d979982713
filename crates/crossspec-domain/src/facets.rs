//! Facets: named, multi-valued tag categories on a claim

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Facet name used for feature tags
pub const FEATURE: &str = "feature";

/// Mapping of facet name to a set of tags
///
/// A claim may carry zero, one or many values under a facet. Iteration is
/// ordered so serialized claims are byte-stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Facets(BTreeMap<String, BTreeSet<String>>);

impl Facets {
    /// Create an empty facet map
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tag under a facet; empty names or values are ignored
    pub fn insert(&mut self, facet: impl Into<String>, value: impl Into<String>) {
        let facet = facet.into();
        let value = value.into();
        if facet.trim().is_empty() || value.trim().is_empty() {
            return;
        }
        self.0.entry(facet).or_default().insert(value);
    }

    /// Builder form of [`Facets::insert`]
    pub fn with(mut self, facet: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(facet, value);
        self
    }

    /// Tags under a facet
    pub fn get(&self, facet: &str) -> Option<&BTreeSet<String>> {
        self.0.get(facet)
    }

    /// Whether the facet carries the given tag
    pub fn contains(&self, facet: &str, value: &str) -> bool {
        self.0.get(facet).is_some_and(|values| values.contains(value))
    }

    /// Whether no facet carries any tag
    pub fn is_empty(&self) -> bool {
        self.0.values().all(BTreeSet::is_empty)
    }

    /// Iterate over every (facet, tag) pair in order
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .flat_map(|(facet, values)| values.iter().map(move |v| (facet.as_str(), v.as_str())))
    }

    /// Merge every tag of `other` into this map
    pub fn extend(&mut self, other: &Facets) {
        for (facet, value) in other.pairs() {
            self.insert(facet, value);
        }
    }

    /// Copy with facet names and tags case-folded
    pub fn case_folded(&self) -> Facets {
        let mut folded = Facets::new();
        for (facet, value) in self.pairs() {
            folded.insert(facet.to_lowercase(), value.to_lowercase());
        }
        folded
    }
}

//! In-memory facet index over a fixed claim set
//!
//! Claims are held sorted by `claim_id` and addressed by their position
//! (a `u32` document number). Every posting list is a `BTreeSet` of
//! document numbers, so any lookup or intersection yields claims in
//! ascending `claim_id` order without a final sort.
//!
//! The index is built once and never mutated; refresh means building a new
//! one and swapping it in through [`crate::IndexHandle`].

use crate::text::tokenize;
use crossspec_domain::{
    ArtifactType, Authority, Claim, ClaimId, ClaimLookup, ClaimQuery, Facets, RelationKind, Status,
};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use tracing::{debug, warn};

type Postings = BTreeSet<u32>;

/// Conjunctive filter over the index
///
/// Facet criteria are ANDed across facet names and ORed within one facet.
/// Token criteria are ANDed. Unset criteria do not constrain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexFilter {
    /// Required facet tags
    pub facets: Facets,
    /// Required artifact type
    pub artifact_type: Option<ArtifactType>,
    /// Required authority
    pub authority: Option<Authority>,
    /// Required status
    pub status: Option<Status>,
    /// Tokens that must all occur in the claim text
    pub tokens: BTreeSet<String>,
}

impl IndexFilter {
    /// Filter matching every claim
    pub fn new() -> Self {
        Self::default()
    }

    /// Require a facet tag
    pub fn with_facet(mut self, facet: &str, value: &str) -> Self {
        self.facets.insert(facet, value);
        self
    }

    /// Require an artifact type
    pub fn with_type(mut self, artifact_type: ArtifactType) -> Self {
        self.artifact_type = Some(artifact_type);
        self
    }

    /// Require an authority
    pub fn with_authority(mut self, authority: Authority) -> Self {
        self.authority = Some(authority);
        self
    }

    /// Require a status
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    /// Require every token of `text`
    pub fn with_text(mut self, text: &str) -> Self {
        self.tokens.extend(tokenize(text));
        self
    }
}

impl From<&ClaimQuery> for IndexFilter {
    fn from(query: &ClaimQuery) -> Self {
        Self {
            facets: query.facets.clone(),
            artifact_type: query.artifact_type,
            authority: query.authority,
            status: query.status,
            tokens: query.text.as_deref().map(tokenize).unwrap_or_default(),
        }
    }
}

/// Read-only inverted index over claims
#[derive(Debug, Default)]
pub struct FacetIndex {
    claims: Vec<Claim>,
    tokens_of: Vec<BTreeSet<String>>,
    ids: HashMap<ClaimId, u32>,
    facets: BTreeMap<(String, String), Postings>,
    types: BTreeMap<ArtifactType, Postings>,
    authorities: HashMap<Authority, Postings>,
    tokens: BTreeMap<String, Postings>,
    superseded: Postings,
    duplicates: usize,
}

impl FacetIndex {
    /// Build an index; on duplicate claim ids the first occurrence wins
    pub fn build(claims: impl IntoIterator<Item = Claim>) -> Self {
        let mut seen = HashSet::new();
        let mut duplicates = 0;
        let mut unique: Vec<Claim> = Vec::new();
        for claim in claims {
            if seen.insert(claim.claim_id().clone()) {
                unique.push(claim);
            } else {
                warn!("Ignoring duplicate claim id {}", claim.claim_id());
                duplicates += 1;
            }
        }
        unique.sort_by(|a, b| a.claim_id().cmp(b.claim_id()));

        let mut index = FacetIndex {
            duplicates,
            ..FacetIndex::default()
        };
        for (doc, claim) in unique.iter().enumerate() {
            let doc = doc as u32;
            index.ids.insert(claim.claim_id().clone(), doc);
            for (facet, value) in claim.facets().case_folded().pairs() {
                index
                    .facets
                    .entry((facet.to_string(), value.to_string()))
                    .or_default()
                    .insert(doc);
            }
            index
                .types
                .entry(claim.source().artifact_type)
                .or_default()
                .insert(doc);
            index
                .authorities
                .entry(claim.authority())
                .or_default()
                .insert(doc);
            let tokens = tokenize(claim.match_text());
            for token in &tokens {
                index.tokens.entry(token.clone()).or_default().insert(doc);
            }
            index.tokens_of.push(tokens);
        }

        for (doc, claim) in unique.iter().enumerate() {
            if !claim.is_authoritative() {
                index.superseded.insert(doc as u32);
            }
            for target in claim.relations().targets(RelationKind::Supersedes) {
                if let Some(&target_doc) = index.ids.get(target) {
                    index.superseded.insert(target_doc);
                }
            }
            // replaced_by only takes effect once the replacement is indexed
            if claim
                .relations()
                .targets(RelationKind::ReplacedBy)
                .any(|target| index.ids.contains_key(target))
            {
                index.superseded.insert(doc as u32);
            }
        }

        index.claims = unique;
        debug!(
            "Indexed {} claims ({} facet tags, {} tokens, {} duplicates)",
            index.claims.len(),
            index.facets.len(),
            index.tokens.len(),
            index.duplicates
        );
        index
    }

    /// Number of indexed claims
    pub fn len(&self) -> usize {
        self.claims.len()
    }

    /// Whether the index holds no claims
    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    /// Claims dropped at build time because their id was already present
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    /// Claim by id
    pub fn get(&self, id: &ClaimId) -> Option<&Claim> {
        self.ids.get(id).map(|&doc| &self.claims[doc as usize])
    }

    /// All claims in id order
    pub fn iter(&self) -> impl Iterator<Item = &Claim> {
        self.claims.iter()
    }

    /// Claims tagged `facet=value` (case-insensitive)
    pub fn by_facet(&self, facet: &str, value: &str) -> Vec<&Claim> {
        self.resolve(self.facet_postings(facet, value))
    }

    /// Claims of one artifact type
    pub fn by_type(&self, artifact_type: ArtifactType) -> Vec<&Claim> {
        self.resolve(self.types.get(&artifact_type))
    }

    /// Claims of one authority
    pub fn by_authority(&self, authority: Authority) -> Vec<&Claim> {
        self.resolve(self.authorities.get(&authority))
    }

    /// Claims whose text contains the token (case-insensitive)
    pub fn by_query_token(&self, token: &str) -> Vec<&Claim> {
        self.resolve(self.tokens.get(&token.to_ascii_lowercase()))
    }

    /// Tokens of a claim's text as indexed
    pub fn tokens_of(&self, id: &ClaimId) -> Option<&BTreeSet<String>> {
        self.ids.get(id).map(|&doc| &self.tokens_of[doc as usize])
    }

    /// Distinct values observed under a facet, sorted
    pub fn facet_values(&self, facet: &str) -> BTreeSet<String> {
        let facet = facet.to_lowercase();
        self.facets
            .keys()
            .filter(|(name, _)| *name == facet)
            .map(|(_, value)| value.clone())
            .collect()
    }

    /// Whether a claim is active and not superseded by any indexed claim
    pub fn is_authoritative(&self, id: &ClaimId) -> bool {
        self.ids
            .get(id)
            .is_some_and(|doc| !self.superseded.contains(doc))
    }

    /// Claims sharing at least one facet tag or token with the query
    ///
    /// Exactly the claims that can score above zero against it.
    pub fn candidates<'a>(
        &self,
        facets: &Facets,
        tokens: impl IntoIterator<Item = &'a String>,
    ) -> Vec<&Claim> {
        let mut docs = Postings::new();
        for (facet, value) in facets.pairs() {
            if let Some(postings) = self.facet_postings(facet, value) {
                docs.extend(postings);
            }
        }
        for token in tokens {
            if let Some(postings) = self.tokens.get(&token.to_ascii_lowercase()) {
                docs.extend(postings);
            }
        }
        self.resolve(Some(&docs))
    }

    /// Claims satisfying every criterion of the filter
    pub fn filter(&self, filter: &IndexFilter) -> Vec<&Claim> {
        let mut sets: Vec<Postings> = Vec::new();

        let mut by_name: BTreeMap<String, Postings> = BTreeMap::new();
        for (facet, value) in filter.facets.case_folded().pairs() {
            let entry = by_name.entry(facet.to_string()).or_default();
            if let Some(postings) = self.facet_postings(facet, value) {
                entry.extend(postings);
            }
        }
        sets.extend(by_name.into_values());

        if let Some(artifact_type) = filter.artifact_type {
            sets.push(self.types.get(&artifact_type).cloned().unwrap_or_default());
        }
        if let Some(authority) = filter.authority {
            sets.push(self.authorities.get(&authority).cloned().unwrap_or_default());
        }
        for token in &filter.tokens {
            sets.push(
                self.tokens
                    .get(&token.to_ascii_lowercase())
                    .cloned()
                    .unwrap_or_default(),
            );
        }

        let docs: Postings = match intersect(sets) {
            Some(docs) => docs,
            None => (0..self.claims.len() as u32).collect(),
        };
        self.resolve(Some(&docs))
            .into_iter()
            .filter(|claim| filter.status.is_none_or(|status| claim.status() == status))
            .collect()
    }

    /// Run a [`ClaimQuery`], honoring its limit
    pub fn search(&self, query: &ClaimQuery) -> Vec<&Claim> {
        let mut claims = self.filter(&IndexFilter::from(query));
        if let Some(limit) = query.limit {
            claims.truncate(limit);
        }
        claims
    }

    fn facet_postings(&self, facet: &str, value: &str) -> Option<&Postings> {
        self.facets
            .get(&(facet.to_lowercase(), value.to_lowercase()))
    }

    fn resolve(&self, docs: Option<&Postings>) -> Vec<&Claim> {
        docs.map(|docs| docs.iter().map(|&doc| &self.claims[doc as usize]).collect())
            .unwrap_or_default()
    }
}

/// Intersection of all sets, smallest first; `None` when there are none
fn intersect(mut sets: Vec<Postings>) -> Option<Postings> {
    sets.sort_by_key(BTreeSet::len);
    let mut iter = sets.into_iter();
    let first = iter.next()?;
    Some(iter.fold(first, |acc, set| acc.intersection(&set).copied().collect()))
}

impl ClaimLookup for FacetIndex {
    fn get_claim(&self, id: &ClaimId) -> Option<&Claim> {
        self.get(id)
    }

    fn claims(&self) -> Box<dyn Iterator<Item = &Claim> + '_> {
        Box::new(self.claims.iter())
    }

    fn claim_count(&self) -> usize {
        self.claims.len()
    }
}

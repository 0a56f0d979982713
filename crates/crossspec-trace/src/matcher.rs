//! Traceability matcher
//!
//! Scores implementation claims against a query built from a
//! specification claim or a requirement fragment:
//!
//! ```text
//! score = facet_weight * |shared facet tags|
//!       + token_weight * |shared tokens| / |query tokens|
//! ```
//!
//! Only `code` claims with status `active` are candidates. Ranking is by
//! score, then authority rank, then ascending claim id.

use crate::config::MatcherConfig;
use crate::error::TraceError;
use crossspec_domain::{ArtifactType, Claim, ClaimId, Facets, Status};
use crossspec_store::tokenize;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use tracing::debug;

/// Where a query came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryOrigin {
    /// A persisted specification claim
    Claim(ClaimId),
    /// A requirement fragment, by position
    Fragment(usize),
}

impl fmt::Display for QueryOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryOrigin::Claim(id) => write!(f, "{}", id),
            QueryOrigin::Fragment(idx) => write!(f, "fragment #{}", idx + 1),
        }
    }
}

/// Facet and token sets a candidate is scored against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceQuery {
    /// Origin of the query
    pub origin: QueryOrigin,
    /// Case-folded facet tags
    pub facets: Facets,
    /// Tokens without stop words
    pub tokens: BTreeSet<String>,
}

impl TraceQuery {
    /// Ad-hoc query, e.g. from a requirement fragment
    pub fn new(origin: QueryOrigin, facets: &Facets, tokens: BTreeSet<String>) -> Self {
        Self {
            origin,
            facets: facets.case_folded(),
            tokens,
        }
    }

    /// Whether there is nothing to score against
    pub fn is_empty(&self) -> bool {
        self.facets.is_empty() && self.tokens.is_empty()
    }
}

/// Why a candidate scored
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    /// Facet tags shared with the query
    pub matched_facets: Facets,
    /// Query tokens found in the candidate text
    pub matched_tokens: BTreeSet<String>,
    /// Facet part of the score
    pub facet_score: f64,
    /// Token part of the score
    pub token_score: f64,
}

/// One ranked candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// Query the candidate answers
    pub query: QueryOrigin,
    /// Candidate implementation claim
    pub candidate: ClaimId,
    /// Total score
    pub score: f64,
    /// Score breakdown
    pub evidence: Evidence,
    #[serde(skip)]
    authority_rank: u8,
}

/// Coverage verdict of a ranked match list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Coverage {
    /// No candidate scored
    None,
    /// Best score below the threshold
    Partial,
    /// At least one score at or above the threshold
    Full,
}

impl Coverage {
    /// Get the verdict as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Coverage::None => "none",
            Coverage::Partial => "partial",
            Coverage::Full => "full",
        }
    }
}

impl fmt::Display for Coverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ranked matches of a specification claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceResult {
    /// Query claim
    pub query: ClaimId,
    /// Matches, best first
    pub matches: Vec<Match>,
    /// Coverage verdict
    pub coverage: Coverage,
}

/// Scores and ranks candidates
#[derive(Debug, Clone)]
pub struct Matcher {
    config: MatcherConfig,
    stop_words: BTreeSet<String>,
}

impl Matcher {
    /// Create a matcher, validating the configuration
    pub fn new(config: MatcherConfig) -> Result<Self, TraceError> {
        config.validate().map_err(TraceError::Config)?;
        let stop_words = config.stop_words.iter().map(|w| w.to_lowercase()).collect();
        Ok(Self { config, stop_words })
    }

    /// Configuration in use
    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Tokens of `text` with stop words removed
    pub fn query_tokens(&self, text: &str) -> BTreeSet<String> {
        tokenize(text)
            .into_iter()
            .filter(|token| !self.stop_words.contains(token))
            .collect()
    }

    /// Build the query of a specification claim
    ///
    /// # Errors
    /// [`TraceError::InvalidQuery`] if the claim has no facets and no
    /// tokens survive stop-word removal.
    pub fn query_for(&self, claim: &Claim) -> Result<TraceQuery, TraceError> {
        let query = TraceQuery::new(
            QueryOrigin::Claim(claim.claim_id().clone()),
            claim.facets(),
            self.query_tokens(claim.match_text()),
        );
        if query.is_empty() {
            return Err(TraceError::InvalidQuery(claim.claim_id().to_string()));
        }
        Ok(query)
    }

    /// Score one candidate; `None` if it is not eligible or scores zero
    pub fn score(&self, query: &TraceQuery, candidate: &Claim) -> Option<Match> {
        if candidate.source().artifact_type != ArtifactType::Code
            || candidate.status() != Status::Active
        {
            return None;
        }
        if let QueryOrigin::Claim(id) = &query.origin {
            if id == candidate.claim_id() {
                return None;
            }
        }

        let mut matched_facets = Facets::new();
        for (facet, value) in candidate.facets().case_folded().pairs() {
            if query.facets.contains(facet, value) {
                matched_facets.insert(facet, value);
            }
        }
        let shared_facets = matched_facets.pairs().count();

        let matched_tokens: BTreeSet<String> = if query.tokens.is_empty() {
            BTreeSet::new()
        } else {
            let candidate_tokens = tokenize(candidate.match_text());
            query
                .tokens
                .intersection(&candidate_tokens)
                .cloned()
                .collect()
        };

        let facet_score = self.config.facet_weight * shared_facets as f64;
        let token_score = if query.tokens.is_empty() {
            0.0
        } else {
            self.config.token_weight * matched_tokens.len() as f64 / query.tokens.len() as f64
        };
        let score = facet_score + token_score;
        if score <= 0.0 {
            return None;
        }

        Some(Match {
            query: query.origin.clone(),
            candidate: candidate.claim_id().clone(),
            score,
            evidence: Evidence {
                matched_facets,
                matched_tokens,
                facet_score,
                token_score,
            },
            authority_rank: candidate.authority().rank(),
        })
    }

    /// Score the pool and keep the best `top_n` matches
    pub fn rank<'a>(
        &self,
        query: &TraceQuery,
        pool: impl IntoIterator<Item = &'a Claim>,
        top_n: usize,
    ) -> Vec<Match> {
        let mut matches: Vec<Match> = pool
            .into_iter()
            .filter_map(|candidate| self.score(query, candidate))
            .collect();
        matches.sort_by(compare);
        matches.truncate(top_n);
        debug!("Ranked {} matches for {}", matches.len(), query.origin);
        matches
    }

    /// Coverage verdict of a ranked list
    pub fn coverage(&self, matches: &[Match]) -> Coverage {
        let best = matches.iter().map(|m| m.score).fold(None, |best: Option<f64>, s| {
            Some(best.map_or(s, |b| b.max(s)))
        });
        match best {
            None => Coverage::None,
            Some(score) if score >= self.config.threshold => Coverage::Full,
            Some(_) => Coverage::Partial,
        }
    }

    /// Trace a specification claim through a candidate pool
    pub fn trace<'a>(
        &self,
        spec_claim: &Claim,
        pool: impl IntoIterator<Item = &'a Claim>,
        top_n: usize,
    ) -> Result<TraceResult, TraceError> {
        let query = self.query_for(spec_claim)?;
        let matches = self.rank(&query, pool, top_n);
        let coverage = self.coverage(&matches);
        Ok(TraceResult {
            query: spec_claim.claim_id().clone(),
            matches,
            coverage,
        })
    }
}

/// Score desc, authority rank desc, claim id asc
fn compare(a: &Match, b: &Match) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| b.authority_rank.cmp(&a.authority_rank))
        .then_with(|| a.candidate.cmp(&b.candidate))
}

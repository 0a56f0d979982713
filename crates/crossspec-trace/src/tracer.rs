//! Matcher and decomposer bound to a loaded index

use crate::config::{DecomposerConfig, MatcherConfig};
use crate::decompose::Decomposer;
use crate::error::TraceError;
use crate::matcher::{Matcher, TraceResult};
use crate::plan::{plan_requirement, PlanResult};
use crossspec_domain::ClaimId;
use crossspec_store::FacetIndex;
use std::sync::Arc;
use tracing::info;

/// Serves `trace` and `plan` over one index snapshot
///
/// Cheap to build per request from [`crossspec_store::IndexHandle::snapshot`];
/// a concurrent index refresh never affects a running tracer.
#[derive(Debug, Clone)]
pub struct Tracer {
    index: Arc<FacetIndex>,
    matcher: Matcher,
    decomposer: Decomposer,
}

impl Tracer {
    /// Create a tracer, validating both configurations
    pub fn new(
        index: Arc<FacetIndex>,
        matcher: MatcherConfig,
        decomposer: DecomposerConfig,
    ) -> Result<Self, TraceError> {
        Ok(Self {
            index,
            matcher: Matcher::new(matcher)?,
            decomposer: Decomposer::new(decomposer)?,
        })
    }

    /// Index in use
    pub fn index(&self) -> &FacetIndex {
        &self.index
    }

    /// Matcher in use
    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Rank implementation claims for a specification claim
    pub fn trace(&self, claim_id: &ClaimId, top_n: usize) -> Result<TraceResult, TraceError> {
        let claim = self
            .index
            .get(claim_id)
            .ok_or_else(|| TraceError::ClaimNotFound(claim_id.to_string()))?;
        let query = self.matcher.query_for(claim)?;
        let candidates = self.index.candidates(&query.facets, &query.tokens);
        let matches = self.matcher.rank(&query, candidates, top_n);
        let coverage = self.matcher.coverage(&matches);
        info!(
            "Traced {}: {} matches, coverage {}",
            claim_id,
            matches.len(),
            coverage
        );
        Ok(TraceResult {
            query: claim_id.clone(),
            matches,
            coverage,
        })
    }

    /// Decompose a requirement and rank candidates for each fragment
    pub fn plan(&self, requirement_text: &str) -> Result<PlanResult, TraceError> {
        let result = plan_requirement(
            &self.decomposer,
            &self.matcher,
            requirement_text,
            self.matcher.config().top_n,
            |query| self.index.candidates(&query.facets, &query.tokens),
        )?;
        info!("Planned requirement: {} fragments", result.fragments.len());
        Ok(result)
    }
}

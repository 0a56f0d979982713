//! Requirement planning: decompose, then match every fragment

use crate::decompose::{Decomposer, Fragment};
use crate::error::TraceError;
use crate::matcher::{Coverage, Match, Matcher, QueryOrigin, TraceQuery};
use crossspec_domain::Claim;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A fragment with its ranked matches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FragmentPlan {
    /// The fragment
    pub fragment: Fragment,
    /// Matches, best first
    pub matches: Vec<Match>,
    /// Coverage of this fragment
    pub coverage: Coverage,
}

/// Breakdown of a requirement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanResult {
    /// Requirement text as given
    pub requirement: String,
    /// Fragments in order
    pub fragments: Vec<FragmentPlan>,
}

impl PlanResult {
    /// Fragment texts in order
    pub fn breakdown(&self) -> Vec<&str> {
        self.fragments.iter().map(|f| f.fragment.text.as_str()).collect()
    }
}

/// Query of a fragment: its guessed facets and stop-word-free tokens
pub fn fragment_query(matcher: &Matcher, fragment: &Fragment) -> TraceQuery {
    TraceQuery::new(
        QueryOrigin::Fragment(fragment.index),
        &fragment.facets,
        matcher.query_tokens(&fragment.text),
    )
}

/// Decompose `requirement_text` and rank candidates for each fragment
///
/// `pool_for` supplies the candidates of one fragment query; it may return
/// the whole pool or a pre-selection.
///
/// # Errors
/// [`TraceError::EmptyRequirement`] if there are no fragments.
pub fn plan_requirement<'a, F, I>(
    decomposer: &Decomposer,
    matcher: &Matcher,
    requirement_text: &str,
    top_n: usize,
    mut pool_for: F,
) -> Result<PlanResult, TraceError>
where
    F: FnMut(&TraceQuery) -> I,
    I: IntoIterator<Item = &'a Claim>,
{
    let fragments = decomposer.decompose(requirement_text);
    if fragments.is_empty() {
        return Err(TraceError::EmptyRequirement);
    }
    debug!("Requirement split into {} fragments", fragments.len());

    let fragments = fragments
        .into_iter()
        .map(|fragment| {
            let query = fragment_query(matcher, &fragment);
            let matches = if query.is_empty() {
                Vec::new()
            } else {
                matcher.rank(&query, pool_for(&query), top_n)
            };
            let coverage = matcher.coverage(&matches);
            FragmentPlan {
                fragment,
                matches,
                coverage,
            }
        })
        .collect();

    Ok(PlanResult {
        requirement: requirement_text.to_string(),
        fragments,
    })
}

/// [`plan_requirement`] over a fixed candidate pool
pub fn plan<'a>(
    decomposer: &Decomposer,
    matcher: &Matcher,
    requirement_text: &str,
    pool: &'a [Claim],
    top_n: usize,
) -> Result<PlanResult, TraceError> {
    plan_requirement(decomposer, matcher, requirement_text, top_n, |_| pool.iter())
}

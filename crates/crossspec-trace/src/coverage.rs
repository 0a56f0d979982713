//! Per-feature coverage report

use crossspec_domain::facets::FEATURE;
use crossspec_domain::ArtifactType;
use crossspec_store::FacetIndex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coverage state of one feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureStatus {
    /// Specified and implemented
    Covered,
    /// No implementation claim
    Unimplemented,
    /// Implemented but never specified
    Untraced,
}

impl FeatureStatus {
    /// Get the status name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureStatus::Covered => "covered",
            FeatureStatus::Unimplemented => "unimplemented",
            FeatureStatus::Untraced => "untraced",
        }
    }

    fn classify(spec_count: usize, impl_count: usize) -> Self {
        if impl_count == 0 {
            FeatureStatus::Unimplemented
        } else if spec_count == 0 {
            FeatureStatus::Untraced
        } else {
            FeatureStatus::Covered
        }
    }
}

impl fmt::Display for FeatureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageRow {
    /// Feature tag
    pub feature: String,
    /// Claims from specification artifacts
    pub spec_count: usize,
    /// Claims from code
    pub impl_count: usize,
    /// Derived state
    pub status: FeatureStatus,
}

/// Count specification and implementation claims per feature
///
/// Without an explicit list every observed `feature` tag is reported.
/// Rows are sorted by feature.
pub fn coverage_report(index: &FacetIndex, features: Option<&[String]>) -> Vec<CoverageRow> {
    let mut features: Vec<String> = match features {
        Some(list) if !list.is_empty() => list.iter().map(|f| f.to_lowercase()).collect(),
        _ => index.facet_values(FEATURE).into_iter().collect(),
    };
    features.sort();
    features.dedup();

    features
        .into_iter()
        .map(|feature| {
            let claims = index.by_facet(FEATURE, &feature);
            let impl_count = claims
                .iter()
                .filter(|c| c.source().artifact_type == ArtifactType::Code)
                .count();
            let spec_count = claims.len() - impl_count;
            CoverageRow {
                status: FeatureStatus::classify(spec_count, impl_count),
                feature,
                spec_count,
                impl_count,
            }
        })
        .collect()
}

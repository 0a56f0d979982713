//! CrossSpec Trace
//!
//! Links specification claims to implementation claims.
//!
//! The trace layer provides:
//! - Facet- and token-based scoring of code claims against a query
//! - Deterministic ranking and a coverage verdict per query
//! - Requirement decomposition into facet-tagged fragments
//! - A per-feature coverage report
//!
//! All operations are pure functions over an already built
//! [`FacetIndex`](crossspec_store::FacetIndex).
//!
//! # Examples
//!
//! ```no_run
//! use crossspec_domain::ClaimId;
//! use crossspec_store::load_index;
//! use crossspec_trace::{DecomposerConfig, MatcherConfig, Tracer};
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let index = load_index(&[PathBuf::from("outputs/claims.jsonl")])?;
//! let tracer = Tracer::new(Arc::new(index), MatcherConfig::default(), DecomposerConfig::default())?;
//!
//! let result = tracer.trace(&ClaimId::parse("CLM-BRAKE-000001")?, 5)?;
//! println!("coverage: {}", result.coverage);
//!
//! let plan = tracer.plan("The brake shall engage within 100 ms.")?;
//! println!("{:?}", plan.breakdown());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod coverage;
mod decompose;
mod error;
mod matcher;
mod plan;
mod tracer;

pub use config::{DecomposerConfig, KeywordRule, MatcherConfig};
pub use coverage::{coverage_report, CoverageRow, FeatureStatus};
pub use decompose::{Decomposer, Fragment};
pub use error::TraceError;
pub use matcher::{Coverage, Evidence, Match, Matcher, QueryOrigin, TraceQuery, TraceResult};
pub use plan::{fragment_query, plan, plan_requirement, FragmentPlan, PlanResult};
pub use tracer::Tracer;

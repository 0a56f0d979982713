//! CrossSpec Extractor
//!
//! Turns source code into claims with a heuristic, AST-free unit scanner.
//!
//! # Overview
//!
//! Files under a repository root are discovered with include/exclude
//! globs, decoded, and partitioned into units (functions, classes or whole
//! files). Each unit becomes an [`ExtractedClaim`](crossspec_domain::ExtractedClaim)
//! that the run context finalizes into a claim with a run-scoped id and a
//! stable hash.
//!
//! # Architecture
//!
//! ```text
//! files → Discovery → Cursor (lexer) → scanner → CodeClaimBuilder → Claim::build
//! ```
//!
//! # Key Features
//!
//! - **Skip-state lexer**: braces and indentation inside comments and
//!   literals never move unit boundaries
//! - **Two scanners**: brace-structured (C, C++) and indentation-structured
//!   (Python)
//! - **Per-file isolation**: decode errors, oversized files and unclosed
//!   units become diagnostics; the run continues
//! - **Parallel runs**: files are scanned on the rayon pool, sharing only
//!   the run's atomic id counter
//!
//! # Example Usage
//!
//! ```no_run
//! use crossspec_domain::{ClaimIdGenerator, IdPrefix, RunContext};
//! use crossspec_extractor::{CodeExtractor, ExtractorConfig};
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ExtractorConfig::default();
//! let ctx = RunContext::new(ClaimIdGenerator::new(config.id_prefix.clone()))
//!     .with_default_authority(config.authority);
//! let extractor = CodeExtractor::new(config)?;
//!
//! let report = extractor.run(Path::new("."), &ctx)?;
//! println!("Claims: {}", report.claims.len());
//! println!("Diagnostics: {}", report.diagnostics.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod builder;
mod config;
mod discovery;
mod error;
mod extractor;
mod language;
pub mod lexer;
mod registry;
pub mod scanner;


pub use builder::{infer_facets, path_tokens, CodeClaimBuilder, FacetRule, LineIndex};
pub use config::{ExtractorConfig, DEFAULT_MAX_FILE_BYTES};
pub use discovery::{Discovered, Discovery, DiscoverySummary, SourceFile, DEFAULT_EXCLUDES};
pub use error::{Diagnostic, DiagnosticKind, ExtractorError};
pub use extractor::{decode_source, finalize_claims, CodeExtractor, FileExtraction, RunReport};
pub use language::{Language, LanguageFilter, Syntax};
pub use registry::{DynExtractor, ExtractedClaimFeed, ExtractorRegistry};
pub use scanner::{scan, scan_units, Granularity, PartialUnit, ScanOutput, Unit};

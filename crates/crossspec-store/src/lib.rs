//! CrossSpec Storage Layer
//!
//! NDJSON claim files and the read-only facet index built from them.
//!
//! # Architecture
//!
//! - NDJSON files hold one claim per line; writes are atomic renames
//! - [`FacetIndex`] keeps inverted posting lists over facets, artifact
//!   type, authority and text tokens
//! - [`IndexHandle`] lets a refresh swap the index under live readers
//!
//! # Examples
//!
//! ```no_run
//! use crossspec_store::{load_index, IndexHandle};
//! use std::path::PathBuf;
//!
//! let index = load_index(&[PathBuf::from("outputs/claims.jsonl")]).unwrap();
//! let handle = IndexHandle::new(index);
//! println!("{} claims", handle.snapshot().len());
//! ```

#![warn(missing_docs)]

mod error;
mod handle;
mod index;
pub mod ndjson;
mod text;

pub use error::StoreError;
pub use handle::IndexHandle;
pub use index::{FacetIndex, IndexFilter};
pub use ndjson::{read_claims, write_claims};
pub use text::tokenize;

use crossspec_domain::Claim;
use std::path::PathBuf;
use tracing::info;

/// Read claim files in order and index them
///
/// Claims from earlier files win over later claims with the same id.
pub fn load_index(paths: &[PathBuf]) -> Result<FacetIndex, StoreError> {
    let mut claims: Vec<Claim> = Vec::new();
    for path in paths {
        claims.extend(read_claims(path)?);
    }
    let index = FacetIndex::build(claims);
    info!(
        "Loaded {} claims from {} file(s)",
        index.len(),
        paths.len()
    );
    Ok(index)
}

//! Command implementations.

pub mod code_extract;
pub mod coverage;
pub mod import;
pub mod plan;
pub mod search;
pub mod show;
pub mod trace;

pub use self::code_extract::execute_code_extract;
pub use self::coverage::execute_coverage;
pub use self::import::execute_import;
pub use self::plan::execute_plan;
pub use self::search::execute_search;
pub use self::show::execute_show;
pub use self::trace::execute_trace;

use crate::config::Config;
use crate::error::{CliError, Result};
use crossspec_store::{load_index, FacetIndex, IndexHandle};
use crossspec_trace::Tracer;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

/// Claim files and the index loaded from them
pub struct Workspace {
    paths: Vec<PathBuf>,
    handle: IndexHandle,
}

impl Workspace {
    /// Load the explicitly given claim files, or the configured ones
    ///
    /// Explicit files must exist. Configured files that do not exist yet
    /// are skipped; at least one must be present.
    pub fn open(explicit: &[PathBuf], config: &Config) -> Result<Self> {
        let paths = if explicit.is_empty() {
            let existing: Vec<PathBuf> = config
                .claim_paths()
                .into_iter()
                .filter(|path| {
                    let exists = path.exists();
                    if !exists {
                        debug!("Skipping missing claim file {}", path.display());
                    }
                    exists
                })
                .collect();
            if existing.is_empty() {
                return Err(CliError::NoClaims);
            }
            existing
        } else {
            explicit.to_vec()
        };

        let workspace = Self {
            paths,
            handle: IndexHandle::default(),
        };
        workspace.refresh()?;
        Ok(workspace)
    }

    /// Re-read the claim files and swap the new index in
    pub fn refresh(&self) -> Result<()> {
        let index = load_index(&self.paths)?;
        if index.duplicates() > 0 {
            warn!("Ignored {} claim(s) with duplicate ids", index.duplicates());
        }
        self.handle.replace(index);
        Ok(())
    }

    /// Claim files in load order
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Current index
    pub fn index(&self) -> Arc<FacetIndex> {
        self.handle.snapshot()
    }

    /// Tracer over the current index with the configured tables
    pub fn tracer(&self, config: &Config) -> Result<Tracer> {
        Ok(Tracer::new(
            self.index(),
            config.matcher.clone(),
            config.decomposer.clone(),
        )?)
    }
}

//! Shared, atomically replaceable index reference

use crate::index::FacetIndex;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::info;

/// Holds the current index for concurrent readers
///
/// Readers take a snapshot (`Arc` clone) and keep using it for the whole
/// request; a refresh builds a new index off to the side and swaps it in
/// with [`IndexHandle::replace`]. In-flight requests keep their snapshot.
#[derive(Debug, Default)]
pub struct IndexHandle {
    current: RwLock<Arc<FacetIndex>>,
}

impl IndexHandle {
    /// Wrap a built index
    pub fn new(index: FacetIndex) -> Self {
        Self {
            current: RwLock::new(Arc::new(index)),
        }
    }

    /// Current index
    pub fn snapshot(&self) -> Arc<FacetIndex> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Swap in a new index, returning the previous one
    pub fn replace(&self, index: FacetIndex) -> Arc<FacetIndex> {
        let next = Arc::new(index);
        info!("Replacing index ({} claims)", next.len());
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, next)
    }
}

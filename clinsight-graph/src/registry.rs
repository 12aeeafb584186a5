//! Process-wide graph snapshot holder.
//!
//! Rebuilds are exclusive; readers clone an `Arc` snapshot and never observe
//! a half-built graph.

use std::sync::{Arc, RwLock};

use tracing::info;

use clinsight_core::errors::ClinsightResult;
use clinsight_core::traits::ITabularStore;

use crate::graph::{builder, EntityGraph};

pub struct GraphRegistry {
    inner: RwLock<Arc<EntityGraph>>,
}

impl GraphRegistry {
    /// Build the initial snapshot from the store.
    pub fn build(store: &dyn ITabularStore) -> ClinsightResult<Self> {
        let graph = builder::build(store)?;
        Ok(Self {
            inner: RwLock::new(Arc::new(graph)),
        })
    }

    /// The current immutable snapshot. Safe for unlimited concurrent readers;
    /// path resolution and propagation run against this without coordination.
    pub fn snapshot(&self) -> Arc<EntityGraph> {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Rebuild from the store and swap the snapshot atomically. In-flight
    /// readers keep their old snapshot until they drop it.
    pub fn rebuild(&self, store: &dyn ITabularStore) -> ClinsightResult<()> {
        let graph = builder::build(store)?;
        let mut slot = self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = Arc::new(graph);
        info!("entity graph snapshot swapped");
        Ok(())
    }
}

//! Application state shared across handlers

use lead_router_engine::LeadRouter;
use lead_router_storage::{InMemorySnapshots, RuleStore, SnapshotStorage, StorageError};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Default storage slot for the routing rule list
pub const DEFAULT_SLOT: &str = "lead-routing-rules";

/// Shared application state
pub struct AppState {
    /// Canonical rule list; single logical writer behind the lock
    pub store: RwLock<RuleStore>,
    pub snapshots: Arc<dyn SnapshotStorage>,
    pub router: LeadRouter,
    pub slot: String,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_storage(Arc::new(InMemorySnapshots::new()), DEFAULT_SLOT)
    }

    /// Create with a custom snapshot backend and storage slot
    pub fn with_storage(snapshots: Arc<dyn SnapshotStorage>, slot: impl Into<String>) -> Self {
        Self {
            store: RwLock::new(RuleStore::new()),
            snapshots,
            router: LeadRouter::new(),
            slot: slot.into(),
        }
    }

    /// Load the persisted rule list into the store on startup.
    /// Returns the number of rules loaded.
    pub async fn load_initial(&self) -> Result<usize, StorageError> {
        match self.snapshots.load(&self.slot).await? {
            Some(rules) => {
                let count = rules.len();
                *self.store.write().await = RuleStore::from_rules(rules);
                Ok(count)
            }
            None => Ok(0),
        }
    }

    /// Persist the current rule list, fire-and-forget: a failed flush is
    /// logged and the in-memory state stays authoritative.
    pub async fn flush(&self) {
        let rules = self.store.read().await.rules().to_vec();
        if let Err(e) = self.snapshots.persist(&self.slot, &rules).await {
            tracing::error!("failed to persist rule snapshot: {}", e);
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

//! Persistence trait for rule snapshots

use async_trait::async_trait;
use lead_router_core::Rule;

use crate::StorageError;

/// Stores serialized rule lists keyed by an application-defined slot.
///
/// The router treats persistence as fire-and-forget: the owning
/// application flushes a snapshot after a batch of mutations and logs
/// failures without surfacing them to callers.
#[async_trait]
pub trait SnapshotStorage: Send + Sync {
    /// Load the rule list stored under `slot`; `None` if never written.
    async fn load(&self, slot: &str) -> Result<Option<Vec<Rule>>, StorageError>;

    /// Overwrite the rule list stored under `slot`.
    async fn persist(&self, slot: &str, rules: &[Rule]) -> Result<(), StorageError>;
}

//! In-memory snapshot storage for development and testing

use async_trait::async_trait;
use lead_router_core::Rule;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::{SnapshotStorage, StorageError};

/// In-memory snapshot store, one rule list per slot
pub struct InMemorySnapshots {
    slots: RwLock<HashMap<String, Vec<Rule>>>,
}

impl InMemorySnapshots {
    pub fn new() -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemorySnapshots {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SnapshotStorage for InMemorySnapshots {
    async fn load(&self, slot: &str) -> Result<Option<Vec<Rule>>, StorageError> {
        let slots = self.slots.read().unwrap();
        Ok(slots.get(slot).cloned())
    }

    async fn persist(&self, slot: &str, rules: &[Rule]) -> Result<(), StorageError> {
        let mut slots = self.slots.write().unwrap();
        slots.insert(slot.to_string(), rules.to_vec());
        Ok(())
    }
}

//! JSON-file snapshot storage
//!
//! One pretty-printed JSON file per slot under a configured directory.

use async_trait::async_trait;
use lead_router_core::Rule;
use std::path::PathBuf;

use crate::{SnapshotStorage, StorageError};

pub struct JsonFileSnapshots {
    dir: PathBuf,
}

impl JsonFileSnapshots {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, slot: &str) -> PathBuf {
        self.dir.join(format!("{}.json", slot))
    }
}

#[async_trait]
impl SnapshotStorage for JsonFileSnapshots {
    async fn load(&self, slot: &str) -> Result<Option<Vec<Rule>>, StorageError> {
        let path = self.path_for(slot);
        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let rules = serde_json::from_slice(&bytes)?;
                Ok(Some(rules))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    async fn persist(&self, slot: &str, rules: &[Rule]) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let json = serde_json::to_vec_pretty(rules)?;
        let path = self.path_for(slot);
        tokio::fs::write(&path, json).await?;
        tracing::debug!("persisted {} rules to {:?}", rules.len(), path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RuleStore;
    use lead_router_core::{
        AgentRef, CreateRuleRequest, Distribution, RuleConditions, RuleType, Strategy,
    };
    use uuid::Uuid;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("lead-router-snapshots-{}", Uuid::new_v4()))
    }

    fn sample_rules() -> Vec<Rule> {
        let mut store = RuleStore::new();
        store.add(CreateRuleRequest {
            name: "kerala-weighted".to_string(),
            description: Some("weighted split for Kerala".to_string()),
            rule_type: RuleType::StateBased,
            priority: Some(1),
            active: true,
            conditions: RuleConditions {
                states: Some(vec!["Kerala".to_string()]),
                ..Default::default()
            },
            distribution: Distribution {
                strategy: Strategy::Weighted,
                agents: vec![
                    AgentRef::weighted("agent-1", 40),
                    AgentRef::weighted("agent-2", 35),
                    AgentRef::weighted("agent-3", 25),
                ],
            },
            scheduling: None,
            limits: None,
        });
        store.rules().to_vec()
    }

    #[tokio::test]
    async fn missing_file_loads_as_none() {
        let snapshots = JsonFileSnapshots::new(temp_dir());
        assert!(snapshots.load("routing-rules").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn persist_then_load_round_trips() {
        let dir = temp_dir();
        let snapshots = JsonFileSnapshots::new(&dir);
        let rules = sample_rules();

        snapshots.persist("routing-rules", &rules).await.unwrap();
        let loaded = snapshots.load("routing-rules").await.unwrap().unwrap();

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, rules[0].id);
        assert_eq!(loaded[0].distribution, rules[0].distribution);

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn persist_overwrites_the_slot() {
        let dir = temp_dir();
        let snapshots = JsonFileSnapshots::new(&dir);
        let rules = sample_rules();

        snapshots.persist("routing-rules", &rules).await.unwrap();
        snapshots.persist("routing-rules", &[]).await.unwrap();

        let loaded = snapshots.load("routing-rules").await.unwrap().unwrap();
        assert!(loaded.is_empty());

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}

//! Canonical rule list with CRUD and priority ordering
//!
//! `RuleStore` is a plain synchronous object with a single logical owner;
//! the service layer wraps it in a lock when rules are shared across
//! tasks. Every mutation re-establishes the sort invariant: ascending by
//! priority, ties broken by insertion order.

use chrono::Utc;
use lead_router_core::{CreateRuleRequest, Rule, RuleType, UpdateRuleRequest};
use uuid::Uuid;

use crate::StorageError;

#[derive(Debug, Clone, Default)]
pub struct RuleStore {
    rules: Vec<Rule>,
}

impl RuleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from a persisted snapshot. The list is re-sorted in
    /// case the snapshot predates a priority edit.
    pub fn from_rules(mut rules: Vec<Rule>) -> Self {
        rules.sort_by_key(|r| r.priority);
        Self { rules }
    }

    /// Add a rule, minting a fresh id. Never fails; condition payloads are
    /// not validated here; a malformed condition simply never matches.
    pub fn add(&mut self, req: CreateRuleRequest) -> Rule {
        let rule = Rule::new(req, self.rules.len() as u32 + 1);
        let added = rule.clone();
        self.rules.push(rule);
        self.sort();
        added
    }

    /// Merge a partial update into the rule with `id`.
    ///
    /// Returns the updated rule, or `None` (a non-error no-op) when no
    /// such rule exists.
    pub fn update(&mut self, id: Uuid, patch: UpdateRuleRequest) -> Option<Rule> {
        let rule = self.rules.iter_mut().find(|r| r.id == id)?;
        rule.apply(patch);
        let updated = rule.clone();
        self.sort();
        Some(updated)
    }

    /// Remove the rule with `id` and return it.
    pub fn remove(&mut self, id: Uuid) -> Result<Rule, StorageError> {
        let idx = self
            .rules
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| StorageError::NotFound(format!("Rule {} not found", id)))?;
        Ok(self.rules.remove(idx))
    }

    /// Flip the `active` flag; returns the new state, `None` if absent.
    /// Deactivating never removes a rule, it only hides it from matching.
    pub fn toggle_active(&mut self, id: Uuid) -> Option<bool> {
        let rule = self.rules.iter_mut().find(|r| r.id == id)?;
        rule.active = !rule.active;
        rule.updated_at = Utc::now();
        Some(rule.active)
    }

    /// Replace the stored order: rules named in `order` come first in that
    /// sequence, the rest keep their relative order after them. Priorities
    /// are reassigned 1-indexed over the final list. Unknown ids are
    /// ignored.
    pub fn reorder(&mut self, order: &[Uuid]) {
        let mut reordered = Vec::with_capacity(self.rules.len());
        for id in order {
            if let Some(idx) = self.rules.iter().position(|r| r.id == *id) {
                reordered.push(self.rules.remove(idx));
            }
        }
        reordered.append(&mut self.rules);
        for (idx, rule) in reordered.iter_mut().enumerate() {
            rule.priority = idx as u32 + 1;
        }
        self.rules = reordered;
    }

    /// Clone the rule with `id` under a fresh id: name suffixed
    /// " (Copy)", deactivated, priority at the end of the list.
    pub fn duplicate(&mut self, id: Uuid) -> Result<Rule, StorageError> {
        let source = self
            .rules
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| StorageError::NotFound(format!("Rule {} not found", id)))?;
        let copy = source.duplicated(self.rules.len() as u32 + 1);
        let added = copy.clone();
        self.rules.push(copy);
        self.sort();
        Ok(added)
    }

    pub fn get(&self, id: Uuid) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id == id)
    }

    pub fn by_type(&self, rule_type: RuleType) -> Vec<&Rule> {
        self.rules
            .iter()
            .filter(|r| r.rule_type == rule_type)
            .collect()
    }

    /// Active rules in priority order, as the matcher expects them.
    pub fn active(&self) -> Vec<&Rule> {
        self.rules.iter().filter(|r| r.active).collect()
    }

    /// All rules in priority order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    // sort_by_key is stable, so equal priorities keep insertion order
    fn sort(&mut self) {
        self.rules.sort_by_key(|r| r.priority);
    }
}

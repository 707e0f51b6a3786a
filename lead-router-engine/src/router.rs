//! Routing decision composition

use lead_router_core::{Lead, RouteOutcome, Rule};
use uuid::Uuid;

use crate::{matcher, Distributor};

/// Matches a lead against the rule list and hands the winning rule to the
/// distributor. Owns the distributor so round-robin cursors survive
/// across calls; matching itself is stateless.
#[derive(Debug, Default)]
pub struct LeadRouter {
    distributor: Distributor,
}

impl LeadRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route `lead` against `rules` (active, priority-sorted).
    pub fn route(&self, rules: &[&Rule], lead: &Lead) -> RouteOutcome {
        let Some(rule) = matcher::first_match(rules, lead) else {
            return RouteOutcome::NoMatch;
        };

        match self.distributor.select(rule) {
            Some(agent_id) => {
                tracing::debug!(
                    "rule '{}' assigned lead to agent '{}'",
                    rule.name,
                    agent_id
                );
                RouteOutcome::Assigned {
                    rule_id: rule.id,
                    rule_name: rule.name.clone(),
                    agent_id,
                    strategy: rule.distribution.strategy,
                }
            }
            None => RouteOutcome::NoAgents {
                rule_id: rule.id,
                rule_name: rule.name.clone(),
            },
        }
    }

    /// Drop per-rule distributor state, e.g. after the rule is deleted.
    pub fn forget_rule(&self, rule_id: Uuid) {
        self.distributor.forget(rule_id);
    }
}

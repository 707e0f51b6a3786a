//! Agent selection strategies

use lead_router_core::{AgentRef, Rule, Strategy};
use parking_lot::Mutex;
use rand::Rng;
use std::collections::HashMap;
use uuid::Uuid;

/// Selects an agent for a matched rule.
///
/// Round-robin keeps a per-rule cursor so successive leads rotate
/// strictly through the agent list; weighted and top-performers are
/// stateless single-shot random draws, so fairness across calls is only
/// statistical.
#[derive(Debug, Default)]
pub struct Distributor {
    cursors: Mutex<HashMap<Uuid, usize>>,
}

impl Distributor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick an agent id for `rule`; `None` only when it lists no agents.
    pub fn select(&self, rule: &Rule) -> Option<String> {
        let agents = &rule.distribution.agents;
        if agents.is_empty() {
            return None;
        }
        let idx = match rule.distribution.strategy {
            Strategy::RoundRobin => self.advance(rule.id, agents.len()),
            Strategy::Weighted => weighted_index(agents),
            Strategy::TopPerformers => rand::thread_rng().gen_range(0..agents.len()),
            // unrecognized strategy data degrades to the first agent
            Strategy::Unknown => 0,
        };
        Some(agents[idx].id.clone())
    }

    /// Drop the rotation cursor for a rule, e.g. after it is deleted.
    pub fn forget(&self, rule_id: Uuid) {
        self.cursors.lock().remove(&rule_id);
    }

    fn advance(&self, rule_id: Uuid, len: usize) -> usize {
        let mut cursors = self.cursors.lock();
        let cursor = cursors.entry(rule_id).or_insert(0);
        // modulo on read keeps the cursor valid when the agent list shrinks
        let idx = *cursor % len;
        *cursor = idx + 1;
        idx
    }
}

/// Walk the list subtracting weights from a uniform draw in
/// `[0, total)`; the agent that takes the remainder negative wins.
/// Unspecified weights count as 1; a zero total degrades to the first
/// agent and the last agent is the fallback.
fn weighted_index(agents: &[AgentRef]) -> usize {
    let total: u32 = agents.iter().map(|a| a.weight.unwrap_or(1)).sum();
    if total == 0 {
        return 0;
    }
    let mut remaining = i64::from(rand::thread_rng().gen_range(0..total));
    for (idx, agent) in agents.iter().enumerate() {
        remaining -= i64::from(agent.weight.unwrap_or(1));
        if remaining < 0 {
            return idx;
        }
    }
    agents.len() - 1
}

//! Core domain models

use chrono::{DateTime, Datelike, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Condition category a rule belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleType {
    StateBased,
    LanguageBased,
    ProductBased,
    Combined,
}

impl std::str::FromStr for RuleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "state-based" => Ok(RuleType::StateBased),
            "language-based" => Ok(RuleType::LanguageBased),
            "product-based" => Ok(RuleType::ProductBased),
            "combined" => Ok(RuleType::Combined),
            other => Err(format!("unknown rule type '{}'", other)),
        }
    }
}

/// Agent selection strategy for a matched rule.
///
/// Strategy values not recognized at deserialization time map to
/// `Unknown`; the distributor degrades those to the first listed agent
/// instead of rejecting the rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    RoundRobin,
    Weighted,
    TopPerformers,
    #[serde(other)]
    Unknown,
}

/// Candidate agent reference; `weight` is only meaningful for the
/// weighted strategy and defaults to 1 when unspecified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRef {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
}

impl AgentRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            weight: None,
        }
    }

    pub fn weighted(id: impl Into<String>, weight: u32) -> Self {
        Self {
            id: id.into(),
            weight: Some(weight),
        }
    }
}

/// Distribution descriptor: strategy plus candidate agent list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distribution {
    pub strategy: Strategy,
    #[serde(default)]
    pub agents: Vec<AgentRef>,
}

/// Optional predicates a lead must satisfy for a rule to apply.
///
/// An absent condition is unconstrained: a rule with no conditions at all
/// matches every lead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConditions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub states: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_lead_score: Option<u32>,
}

impl RuleConditions {
    /// True when every present condition holds for `lead`.
    ///
    /// A lead missing a field fails any condition constraining that field.
    pub fn satisfied_by(&self, lead: &Lead) -> bool {
        if let Some(states) = &self.states {
            match &lead.state {
                Some(state) if states.contains(state) => {}
                _ => return false,
            }
        }
        if let Some(languages) = &self.languages {
            match &lead.language {
                Some(language) if languages.contains(language) => {}
                _ => return false,
            }
        }
        if let Some(product) = &self.product {
            if lead.product.as_ref() != Some(product) {
                return false;
            }
        }
        if let Some(lead_type) = &self.lead_type {
            if lead.lead_type.as_ref() != Some(lead_type) {
                return false;
            }
        }
        if let Some(min) = self.min_lead_score {
            if lead.lead_score < min {
                return false;
            }
        }
        true
    }
}

/// Allowed weekdays and a time-of-day window.
///
/// Advisory: the matcher never checks it. The evaluator filters rules
/// outside the current window before matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub days: Vec<Weekday>,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl Schedule {
    /// Whether `at` falls on an allowed day inside the time window.
    /// Windows with `end < start` wrap past midnight.
    pub fn allows(&self, at: DateTime<Utc>) -> bool {
        if !self.days.contains(&at.weekday()) {
            return false;
        }
        let time = at.time();
        if self.start <= self.end {
            time >= self.start && time <= self.end
        } else {
            time >= self.start || time <= self.end
        }
    }
}

/// Per-agent intake limits. Advisory metadata for an external throttling
/// collaborator; never computed by the router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleLimits {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_leads_per_agent: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_leads_per_day: Option<u32>,
}

/// A prioritized routing rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    /// Unique identifier, immutable once created
    pub id: Uuid,
    /// Human-readable name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Condition category
    pub rule_type: RuleType,
    /// Lower value = higher precedence; ties break by insertion order
    pub priority: u32,
    /// Inactive rules are excluded from matching entirely
    pub active: bool,
    /// Predicates an incoming lead must satisfy
    pub conditions: RuleConditions,
    /// How to pick an agent once the rule matches
    pub distribution: Distribution,
    /// Advisory scheduling window
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduling: Option<Schedule>,
    /// Advisory intake limits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limits: Option<RuleLimits>,
    /// When this rule was created
    pub created_at: DateTime<Utc>,
    /// When this rule was last modified
    pub updated_at: DateTime<Utc>,
}

impl Rule {
    /// Build a rule from a creation request, minting a fresh id.
    /// `fallback_priority` applies when the request carries none.
    pub fn new(req: CreateRuleRequest, fallback_priority: u32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: req.name,
            description: req.description,
            rule_type: req.rule_type,
            priority: req.priority.unwrap_or(fallback_priority),
            active: req.active,
            conditions: req.conditions,
            distribution: req.distribution,
            scheduling: req.scheduling,
            limits: req.limits,
            created_at: now,
            updated_at: now,
        }
    }

    /// Clone this rule under a fresh id: name suffixed " (Copy)",
    /// deactivated, with the given priority. The original is untouched.
    pub fn duplicated(&self, priority: u32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: format!("{} (Copy)", self.name),
            active: false,
            priority,
            created_at: now,
            updated_at: now,
            ..self.clone()
        }
    }

    /// Merge a partial update: only provided fields change.
    pub fn apply(&mut self, patch: UpdateRuleRequest) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(rule_type) = patch.rule_type {
            self.rule_type = rule_type;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(active) = patch.active {
            self.active = active;
        }
        if let Some(conditions) = patch.conditions {
            self.conditions = conditions;
        }
        if let Some(distribution) = patch.distribution {
            self.distribution = distribution;
        }
        if let Some(scheduling) = patch.scheduling {
            self.scheduling = Some(scheduling);
        }
        if let Some(limits) = patch.limits {
            self.limits = Some(limits);
        }
        self.updated_at = Utc::now();
    }
}

/// An incoming lead as seen by the router.
///
/// CRM fields the router does not inspect travel through `extra`
/// untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Lead {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_type: Option<String>,
    #[serde(default)]
    pub lead_score: u32,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Result of a routing decision.
///
/// `NoMatch` is a normal outcome, not an error: callers own the default
/// assignment policy for unrouted leads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum RouteOutcome {
    /// A rule matched and an agent was selected
    Assigned {
        rule_id: Uuid,
        rule_name: String,
        agent_id: String,
        strategy: Strategy,
    },
    /// A rule matched but lists no agents
    NoAgents { rule_id: Uuid, rule_name: String },
    /// No active rule's conditions held
    NoMatch,
}

/// Request to create a new rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRuleRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub rule_type: RuleType,
    /// Defaults to the end of the current list when omitted
    #[serde(default)]
    pub priority: Option<u32>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub conditions: RuleConditions,
    pub distribution: Distribution,
    #[serde(default)]
    pub scheduling: Option<Schedule>,
    #[serde(default)]
    pub limits: Option<RuleLimits>,
}

fn default_active() -> bool {
    true
}

/// Partial rule update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRuleRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub rule_type: Option<RuleType>,
    #[serde(default)]
    pub priority: Option<u32>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub conditions: Option<RuleConditions>,
    #[serde(default)]
    pub distribution: Option<Distribution>,
    #[serde(default)]
    pub scheduling: Option<Schedule>,
    #[serde(default)]
    pub limits: Option<RuleLimits>,
}

/// Request to replace the stored rule order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderRulesRequest {
    /// Rule ids in their new sequence; priorities are reassigned 1-indexed
    pub order: Vec<Uuid>,
}

//! API request handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use lead_router_core::{
    CreateRuleRequest, Lead, ReorderRulesRequest, RouteOutcome, Rule, RuleType, UpdateRuleRequest,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{ApiError, AppState};

// ==================== Rule Handlers ====================

/// Create a new routing rule
pub async fn create_rule(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateRuleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let rule = state.store.write().await.add(req);
    state.flush().await;

    tracing::info!("created rule '{}' with priority {}", rule.name, rule.priority);

    Ok((StatusCode::CREATED, Json(rule)))
}

#[derive(Debug, Deserialize)]
pub struct ListRulesQuery {
    rule_type: Option<String>,
}

/// List rules in priority order, optionally filtered by type
pub async fn list_rules(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListRulesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let store = state.store.read().await;

    let rules: Vec<Rule> = match query.rule_type {
        Some(raw) => {
            let rule_type: RuleType = raw.parse().map_err(ApiError::BadRequest)?;
            store.by_type(rule_type).into_iter().cloned().collect()
        }
        None => store.rules().to_vec(),
    };

    Ok(Json(rules))
}

/// Get a rule by ID
pub async fn get_rule(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let store = state.store.read().await;

    match store.get(id) {
        Some(rule) => Ok(Json(rule.clone())),
        None => Err(ApiError::NotFound(format!("Rule {} not found", id))),
    }
}

/// Merge a partial update into a rule
pub async fn update_rule(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(patch): Json<UpdateRuleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let updated = state.store.write().await.update(id, patch);

    match updated {
        Some(rule) => {
            state.flush().await;
            Ok(Json(rule))
        }
        None => Err(ApiError::NotFound(format!("Rule {} not found", id))),
    }
}

#[derive(Debug, Deserialize)]
pub struct DeleteRuleQuery {
    #[serde(default)]
    confirm: bool,
}

/// Delete a rule. Destructive, so the two-step protocol applies: the
/// first call answers 409 until the caller repeats it with
/// `?confirm=true`.
pub async fn delete_rule(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Query(query): Query<DeleteRuleQuery>,
) -> Result<impl IntoResponse, ApiError> {
    if !query.confirm {
        return Err(ApiError::ConfirmationRequired(format!(
            "deleting rule {} is irreversible; repeat with ?confirm=true",
            id
        )));
    }

    let removed = state.store.write().await.remove(id)?;
    state.router.forget_rule(id);
    state.flush().await;

    tracing::info!("deleted rule '{}'", removed.name);

    Ok(Json(removed))
}

/// Flip a rule's active flag
pub async fn toggle_rule(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let toggled = {
        let mut store = state.store.write().await;
        store.toggle_active(id).and_then(|_| store.get(id).cloned())
    };

    match toggled {
        Some(rule) => {
            state.flush().await;
            Ok(Json(rule))
        }
        None => Err(ApiError::NotFound(format!("Rule {} not found", id))),
    }
}

/// Clone a rule under a fresh id, deactivated, at the end of the list
pub async fn duplicate_rule(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let copy = state.store.write().await.duplicate(id)?;
    state.flush().await;

    tracing::info!("duplicated rule {} as '{}'", id, copy.name);

    Ok((StatusCode::CREATED, Json(copy)))
}

/// Replace the stored rule order; priorities are reassigned 1-indexed
pub async fn reorder_rules(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ReorderRulesRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let rules = {
        let mut store = state.store.write().await;
        store.reorder(&req.order);
        store.rules().to_vec()
    };
    state.flush().await;

    Ok(Json(rules))
}

// ==================== Routing Handler ====================

/// Route an incoming lead to an agent.
///
/// Scheduling windows are enforced here, outside the matcher: rules whose
/// window excludes the current instant are dropped before matching.
pub async fn route_lead(
    State(state): State<Arc<AppState>>,
    Json(lead): Json<Lead>,
) -> Result<impl IntoResponse, ApiError> {
    let store = state.store.read().await;
    let now = Utc::now();
    let candidates: Vec<&Rule> = store
        .active()
        .into_iter()
        .filter(|rule| {
            rule.scheduling
                .as_ref()
                .map_or(true, |schedule| schedule.allows(now))
        })
        .collect();

    let outcome = state.router.route(&candidates, &lead);

    match &outcome {
        RouteOutcome::Assigned {
            rule_name,
            agent_id,
            ..
        } => tracing::info!("routed lead to '{}' via rule '{}'", agent_id, rule_name),
        RouteOutcome::NoAgents { rule_name, .. } => {
            tracing::warn!("rule '{}' matched but lists no agents", rule_name)
        }
        RouteOutcome::NoMatch => tracing::info!("no rule matched the lead"),
    }

    Ok(Json(outcome))
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "lead-router"
    }))
}

//! Lead Router API Server
//!
//! REST API for managing routing rules and routing incoming leads.

pub mod error;
pub mod handlers;
pub mod state;

pub use error::ApiError;
pub use state::{AppState, DEFAULT_SLOT};

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn create_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Rules
        .route("/api/rules", post(handlers::create_rule).get(handlers::list_rules))
        .route("/api/rules/reorder", put(handlers::reorder_rules))
        .route(
            "/api/rules/:id",
            get(handlers::get_rule)
                .patch(handlers::update_rule)
                .delete(handlers::delete_rule),
        )
        .route("/api/rules/:id/toggle", post(handlers::toggle_rule))
        .route("/api/rules/:id/duplicate", post(handlers::duplicate_rule))
        // Routing
        .route("/api/route", post(handlers::route_lead))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

//! Lead Router - Main Application Entry Point
//!
//! A rule-based lead router: incoming leads are matched against an
//! ordered rule list and assigned to agents via per-rule distribution
//! strategies.

use lead_router_api::{AppState, DEFAULT_SLOT};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,lead_router=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse::<u16>()?;

    tracing::info!("Starting Lead Router server on {}:{}", host, port);

    // Initialize snapshot backend
    let storage_type = std::env::var("STORAGE_TYPE").unwrap_or_else(|_| "memory".to_string());
    let slot = std::env::var("STORAGE_SLOT").unwrap_or_else(|_| DEFAULT_SLOT.to_string());

    let snapshots: Arc<dyn lead_router_storage::SnapshotStorage> = if storage_type == "file" {
        let dir = std::env::var("STORAGE_DIR").unwrap_or_else(|_| "./data".to_string());
        tracing::info!("Initializing JSON-file storage in {}", dir);
        Arc::new(lead_router_storage::JsonFileSnapshots::new(dir))
    } else {
        tracing::info!("Initializing in-memory storage");
        Arc::new(lead_router_storage::InMemorySnapshots::new())
    };

    // Create shared application state and load the persisted rule list
    let app_state = Arc::new(AppState::with_storage(snapshots, slot));

    match app_state.load_initial().await {
        Ok(count) if count > 0 => {
            tracing::info!("Loaded {} routing rules from storage", count);
        }
        Ok(_) => {
            tracing::info!("No persisted rules found, starting empty");
        }
        Err(e) => {
            tracing::warn!("Failed to load persisted rules: {}", e);
        }
    }

    // Build our application with routes
    let app = lead_router_api::create_router(app_state);

    // Run it
    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port)).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

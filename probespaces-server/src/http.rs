//! HTTP surface: health and space listing endpoints, router assembly

use crate::hub::ConnectionHub;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use probespaces_core::protocol::SpaceSummary;
use probespaces_core::SpaceCoordinator;
use serde::Serialize;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared state for all handlers
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<SpaceCoordinator>,
    pub hub: Arc<ConnectionHub>,
}

/// Assemble the full router: WebSocket endpoint plus the HTTP side channel
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ws", get(crate::ws::ws_handler))
        .route("/health", get(health))
        .route("/spaces", get(list_spaces))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: &'static str,
    active_spaces: usize,
    timestamp: String,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        active_spaces: state.coordinator.active_space_count().await,
        timestamp: Utc::now().to_rfc3339(),
    })
}

#[derive(Debug, Serialize)]
struct SpacesResponse {
    spaces: Vec<SpaceSummary>,
}

async fn list_spaces(State(state): State<AppState>) -> Json<SpacesResponse> {
    Json(SpacesResponse {
        spaces: state.coordinator.list_spaces().await,
    })
}

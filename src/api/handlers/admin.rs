use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::response::PageError;
use crate::AppState;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct PurgeResponse {
    pub shelves_deleted: u64,
    pub reviews_deleted: u64,
    pub users_deleted: u64,
    pub sessions_deleted: u64,
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn admin_purge(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PurgeResponse>, PageError> {
    let stats = state.db.purge_all()?;

    tracing::warn!(
        shelves = stats.shelves,
        reviews = stats.reviews,
        users = stats.users,
        "Purged all data"
    );

    Ok(Json(PurgeResponse {
        shelves_deleted: stats.shelves,
        reviews_deleted: stats.reviews,
        users_deleted: stats.users,
        sessions_deleted: stats.sessions,
    }))
}

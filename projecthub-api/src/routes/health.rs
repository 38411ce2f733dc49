/// Health check endpoint
///
/// # Endpoints
///
/// - `GET /health` - Liveness probe (also pings the database)

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use serde::Serialize;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always "ok" when the server can respond
    pub status: &'static str,

    /// Server version
    pub version: &'static str,

    /// Whether the database answered the ping
    pub database: bool,
}

/// Liveness probe
///
/// Returns 200 with basic status information. The database flag is
/// informational; the endpoint itself stays healthy even when the pool is
/// struggling so orchestrators can distinguish the two failure modes.
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let database = projecthub_shared::db::pool::ping(&state.db).await.is_ok();

    Ok(Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        database,
    }))
}

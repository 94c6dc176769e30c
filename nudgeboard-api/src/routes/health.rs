/// Service index and health check endpoints
///
/// # Endpoints
///
/// - `GET /` - Service name, version, and endpoint overview
/// - `GET /health` - Liveness plus database connectivity

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use serde::Serialize;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Application version
    pub version: String,

    /// Database status
    pub database: String,
}

/// Service index response
#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub message: String,
    pub version: String,
    pub endpoints: Vec<String>,
}

/// Service index handler
///
/// A public landing response listing the main endpoints, handy for
/// checking that the server is reachable at all.
pub async fn index() -> Json<IndexResponse> {
    Json(IndexResponse {
        message: "Nudgeboard API server".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: vec![
            "POST /api/register".to_string(),
            "POST /api/login".to_string(),
            "GET /api/users".to_string(),
            "GET /api/tasks".to_string(),
            "POST /api/tasks".to_string(),
            "PUT /api/tasks/:id/complete".to_string(),
            "GET /api/notifications".to_string(),
        ],
    })
}

/// Health check handler
///
/// Returns service health including database connectivity.
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let database_status = match sqlx::query("SELECT 1").fetch_one(&state.db).await {
        Ok(_) => "connected",
        Err(_) => "disconnected",
    };

    Ok(Json(HealthResponse {
        status: if database_status == "connected" {
            "healthy".to_string()
        } else {
            "degraded".to_string()
        },
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database_status.to_string(),
    }))
}

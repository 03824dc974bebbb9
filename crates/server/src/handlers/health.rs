//! Health and banner endpoints.

use crate::error::ApiResult;
use crate::handlers::common::format_timestamp;
use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use serde::Serialize;
use time::OffsetDateTime;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    pub timestamp: String,
}

/// Root banner response.
#[derive(Debug, Serialize)]
pub struct BannerResponse {
    pub message: &'static str,
    pub version: &'static str,
}

/// GET /health
///
/// Intentionally unauthenticated for load balancer probes.
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let database = match state.metadata.health_check().await {
        Ok(()) => "connected",
        Err(e) => {
            tracing::warn!(error = %e, "health check: metadata store unreachable");
            "disconnected"
        }
    };

    Ok(Json(HealthResponse {
        status: "ok",
        database,
        timestamp: format_timestamp(OffsetDateTime::now_utc())?,
    }))
}

/// GET /
pub async fn banner() -> Json<BannerResponse> {
    Json(BannerResponse {
        message: "strongbox metadata service",
        version: env!("CARGO_PKG_VERSION"),
    })
}

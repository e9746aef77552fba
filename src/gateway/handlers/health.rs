use axum::{Json, extract::State};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::gateway::{state::AppState, types::ApiResponse};

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthData {
    pub status: &'static str,
    pub version: &'static str,
    pub database: bool,
}

/// Service health
///
/// GET /api/v1/health
#[utoipa::path(
    get,
    path = "/api/v1/health",
    responses((status = 200, description = "Service health", body = ApiResponse<HealthData>)),
    tag = "Health"
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<ApiResponse<HealthData>> {
    let database = state.db.health_check().await.is_ok();
    Json(ApiResponse::success(HealthData {
        status: if database { "ok" } else { "degraded" },
        version: env!("GIT_HASH"),
        database,
    }))
}

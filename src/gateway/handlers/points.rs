//! Points balance and history handlers

use axum::{Extension, Json, extract::State};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::ExchangeError;
use crate::gateway::{state::AppState, types::ApiResponse};
use crate::points::ledger::ReconcileReport;
use crate::points::{PointsEntry, PointsLedger};
use crate::user_auth::Claims;

#[derive(Debug, Serialize, ToSchema)]
pub struct BalanceData {
    pub user_id: i64,
    pub points: i64,
}

/// The caller's cached point balance
///
/// GET /api/v1/points/balance
#[utoipa::path(
    get,
    path = "/api/v1/points/balance",
    responses((status = 200, description = "Current balance", body = ApiResponse<BalanceData>)),
    tag = "Points"
)]
pub async fn get_balance(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<BalanceData>>, ExchangeError> {
    let user_id = claims.user_id()?;
    let points = PointsLedger::balance(state.pool(), user_id).await?;
    Ok(Json(ApiResponse::success(BalanceData { user_id, points })))
}

/// The caller's ledger history, newest first
///
/// GET /api/v1/points/history
#[utoipa::path(
    get,
    path = "/api/v1/points/history",
    responses((status = 200, description = "Ledger entries", body = ApiResponse<Vec<PointsEntry>>)),
    tag = "Points"
)]
pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<Vec<PointsEntry>>>, ExchangeError> {
    let entries = PointsLedger::history(state.pool(), claims.user_id()?).await?;
    Ok(Json(ApiResponse::success(entries)))
}

/// Audit the caller's cached balance against the ledger sum
///
/// GET /api/v1/points/reconcile
#[utoipa::path(
    get,
    path = "/api/v1/points/reconcile",
    responses(
        (status = 200, description = "Reconciliation report", body = ApiResponse<ReconcileReport>)
    ),
    tag = "Points"
)]
pub async fn reconcile(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<ReconcileReport>>, ExchangeError> {
    let report = PointsLedger::reconcile(state.pool(), claims.user_id()?).await?;
    Ok(Json(ApiResponse::success(report)))
}

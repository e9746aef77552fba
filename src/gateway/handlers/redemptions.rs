//! Redemption lifecycle handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use crate::error::ExchangeError;
use crate::gateway::{state::AppState, types::ApiResponse};
use crate::redemptions::{Redemption, RedemptionService};
use crate::user_auth::Claims;

/// Redeem an item with points
///
/// POST /api/v1/redemptions/items/{item_id}
#[utoipa::path(
    post,
    path = "/api/v1/redemptions/items/{item_id}",
    params(("item_id" = i64, Path, description = "Item to redeem")),
    responses(
        (status = 201, description = "Redemption created", body = ApiResponse<Redemption>),
        (status = 409, description = "Item already redeemed"),
        (status = 422, description = "Insufficient points")
    ),
    tag = "Redemptions"
)]
pub async fn redeem_item(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(item_id): Path<i64>,
) -> Result<(StatusCode, Json<ApiResponse<Redemption>>), ExchangeError> {
    let redemption = RedemptionService::redeem(state.pool(), claims.user_id()?, item_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_msg(
            "Successfully redeemed the item",
            redemption,
        )),
    ))
}

/// The non-cancelled redemption holding an item, if any
///
/// GET /api/v1/redemptions/items/{item_id}
#[utoipa::path(
    get,
    path = "/api/v1/redemptions/items/{item_id}",
    params(("item_id" = i64, Path, description = "Item id")),
    responses(
        (status = 200, description = "Redemption holding the item, or null",
         body = ApiResponse<Option<Redemption>>)
    ),
    tag = "Redemptions"
)]
pub async fn get_redemption_status(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<i64>,
) -> Result<Json<ApiResponse<Option<Redemption>>>, ExchangeError> {
    let redemption = RedemptionService::status_for_item(state.pool(), item_id).await?;
    Ok(Json(ApiResponse::success(redemption)))
}

/// The caller's redemptions
///
/// GET /api/v1/redemptions
#[utoipa::path(
    get,
    path = "/api/v1/redemptions",
    responses(
        (status = 200, description = "The caller's redemptions", body = ApiResponse<Vec<Redemption>>)
    ),
    tag = "Redemptions"
)]
pub async fn list_redemptions(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<Vec<Redemption>>>, ExchangeError> {
    let redemptions = RedemptionService::list_for_user(state.pool(), claims.user_id()?).await?;
    Ok(Json(ApiResponse::success(redemptions)))
}

/// Item owner confirms shipment
///
/// PUT /api/v1/redemptions/{redemption_id}/shipped
#[utoipa::path(
    put,
    path = "/api/v1/redemptions/{redemption_id}/shipped",
    params(("redemption_id" = i64, Path, description = "Redemption id")),
    responses(
        (status = 200, description = "Marked shipped", body = ApiResponse<Redemption>),
        (status = 403, description = "Not the item owner"),
        (status = 409, description = "Not in a shippable state")
    ),
    tag = "Redemptions"
)]
pub async fn mark_shipped(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(redemption_id): Path<i64>,
) -> Result<Json<ApiResponse<Redemption>>, ExchangeError> {
    let redemption =
        RedemptionService::mark_shipped(state.pool(), redemption_id, claims.user_id()?).await?;
    Ok(Json(ApiResponse::success_with_msg(
        "Sender marked the item as shipped",
        redemption,
    )))
}

/// Redeemer confirms receipt; completes the redemption
///
/// PUT /api/v1/redemptions/{redemption_id}/received
#[utoipa::path(
    put,
    path = "/api/v1/redemptions/{redemption_id}/received",
    params(("redemption_id" = i64, Path, description = "Redemption id")),
    responses(
        (status = 200, description = "Redemption completed", body = ApiResponse<Redemption>),
        (status = 403, description = "Not the redeemer"),
        (status = 409, description = "Not shipped yet, or already received")
    ),
    tag = "Redemptions"
)]
pub async fn mark_received(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(redemption_id): Path<i64>,
) -> Result<Json<ApiResponse<Redemption>>, ExchangeError> {
    let redemption =
        RedemptionService::mark_received(state.pool(), redemption_id, claims.user_id()?).await?;
    Ok(Json(ApiResponse::success_with_msg(
        "Item marked as received. Sender rewarded",
        redemption,
    )))
}

/// Redeemer cancels before shipment
///
/// PUT /api/v1/redemptions/{redemption_id}/cancel
#[utoipa::path(
    put,
    path = "/api/v1/redemptions/{redemption_id}/cancel",
    params(("redemption_id" = i64, Path, description = "Redemption id")),
    responses(
        (status = 200, description = "Redemption cancelled", body = ApiResponse<Redemption>),
        (status = 403, description = "Not the redeemer"),
        (status = 409, description = "Shipped or completed")
    ),
    tag = "Redemptions"
)]
pub async fn cancel_redemption(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(redemption_id): Path<i64>,
) -> Result<Json<ApiResponse<Redemption>>, ExchangeError> {
    let redemption =
        RedemptionService::cancel(state.pool(), redemption_id, claims.user_id()?).await?;
    Ok(Json(ApiResponse::success_with_msg(
        "Redemption was cancelled",
        redemption,
    )))
}

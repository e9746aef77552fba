//! Swap lifecycle handlers

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use crate::error::ExchangeError;
use crate::gateway::{state::AppState, types::ApiResponse};
use crate::swaps::service::CompletionOutcome;
use crate::swaps::{Swap, SwapService};
use crate::user_auth::Claims;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProposeSwapRequest {
    /// The proposer's own item
    pub proposed_item_id: i64,
    /// The other party
    pub receiver_id: i64,
    /// The receiver's item the proposer wants
    pub received_item_id: i64,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListSwapsQuery {
    /// "incoming", "outgoing", or "all" (default)
    pub direction: Option<String>,
}

/// Propose a swap
///
/// POST /api/v1/swaps/propose
#[utoipa::path(
    post,
    path = "/api/v1/swaps/propose",
    request_body = ProposeSwapRequest,
    responses(
        (status = 201, description = "Swap proposed", body = ApiResponse<Swap>),
        (status = 400, description = "Invalid proposal"),
        (status = 409, description = "An item is not available")
    ),
    tag = "Swaps"
)]
pub async fn propose_swap(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<ProposeSwapRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Swap>>), ExchangeError> {
    let swap = SwapService::propose(
        state.pool(),
        claims.user_id()?,
        req.proposed_item_id,
        req.receiver_id,
        req.received_item_id,
        req.message,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_msg(
            "Successfully proposed a swap",
            swap,
        )),
    ))
}

/// Swaps the caller is a party to
///
/// GET /api/v1/swaps
#[utoipa::path(
    get,
    path = "/api/v1/swaps",
    params(ListSwapsQuery),
    responses((status = 200, description = "Swaps for the caller", body = ApiResponse<Vec<Swap>>)),
    tag = "Swaps"
)]
pub async fn list_swaps(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<ListSwapsQuery>,
) -> Result<Json<ApiResponse<Vec<Swap>>>, ExchangeError> {
    let swaps = SwapService::list(
        state.pool(),
        claims.user_id()?,
        query.direction.as_deref(),
    )
    .await?;

    Ok(Json(ApiResponse::success(swaps)))
}

/// Fetch one swap (parties only)
///
/// GET /api/v1/swaps/{swap_id}
#[utoipa::path(
    get,
    path = "/api/v1/swaps/{swap_id}",
    params(("swap_id" = i64, Path, description = "Swap id")),
    responses(
        (status = 200, description = "The swap", body = ApiResponse<Swap>),
        (status = 404, description = "Swap not found")
    ),
    tag = "Swaps"
)]
pub async fn get_swap(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(swap_id): Path<i64>,
) -> Result<Json<ApiResponse<Swap>>, ExchangeError> {
    let swap = crate::swaps::SwapRepository::get(state.pool(), swap_id)
        .await?
        .ok_or(ExchangeError::NotFound("Swap"))?;

    if !swap.is_party(claims.user_id()?) {
        return Err(ExchangeError::unauthorized(
            "You are not a party to this swap",
        ));
    }

    Ok(Json(ApiResponse::success(swap)))
}

/// Accept a pending swap (receiver only)
///
/// PUT /api/v1/swaps/{swap_id}/accept
#[utoipa::path(
    put,
    path = "/api/v1/swaps/{swap_id}/accept",
    params(("swap_id" = i64, Path, description = "Swap id")),
    responses(
        (status = 200, description = "Swap accepted", body = ApiResponse<Swap>),
        (status = 403, description = "Not the receiver"),
        (status = 409, description = "Swap is no longer pending")
    ),
    tag = "Swaps"
)]
pub async fn accept_swap(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(swap_id): Path<i64>,
) -> Result<Json<ApiResponse<Swap>>, ExchangeError> {
    let swap = SwapService::accept(state.pool(), swap_id, claims.user_id()?).await?;
    Ok(Json(ApiResponse::success_with_msg(
        "Successfully accepted the swap proposal",
        swap,
    )))
}

/// Reject a pending swap (receiver only)
///
/// PUT /api/v1/swaps/{swap_id}/reject
#[utoipa::path(
    put,
    path = "/api/v1/swaps/{swap_id}/reject",
    params(("swap_id" = i64, Path, description = "Swap id")),
    responses(
        (status = 200, description = "Swap rejected", body = ApiResponse<Swap>),
        (status = 403, description = "Not the receiver"),
        (status = 409, description = "Swap is no longer pending")
    ),
    tag = "Swaps"
)]
pub async fn reject_swap(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(swap_id): Path<i64>,
) -> Result<Json<ApiResponse<Swap>>, ExchangeError> {
    let swap = SwapService::reject(state.pool(), swap_id, claims.user_id()?).await?;
    Ok(Json(ApiResponse::success_with_msg(
        "Swap proposal rejected",
        swap,
    )))
}

/// Cancel a pending swap (proposer only)
///
/// PUT /api/v1/swaps/{swap_id}/cancel
#[utoipa::path(
    put,
    path = "/api/v1/swaps/{swap_id}/cancel",
    params(("swap_id" = i64, Path, description = "Swap id")),
    responses(
        (status = 200, description = "Swap cancelled", body = ApiResponse<Swap>),
        (status = 403, description = "Not the proposer"),
        (status = 409, description = "Swap is no longer pending")
    ),
    tag = "Swaps"
)]
pub async fn cancel_swap(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(swap_id): Path<i64>,
) -> Result<Json<ApiResponse<Swap>>, ExchangeError> {
    let swap = SwapService::cancel(state.pool(), swap_id, claims.user_id()?).await?;
    Ok(Json(ApiResponse::success_with_msg(
        "Swap proposal cancelled",
        swap,
    )))
}

/// Confirm completion for the caller's side of an accepted swap
///
/// PUT /api/v1/swaps/{swap_id}/complete
#[utoipa::path(
    put,
    path = "/api/v1/swaps/{swap_id}/complete",
    params(("swap_id" = i64, Path, description = "Swap id")),
    responses(
        (status = 200, description = "Completion recorded", body = ApiResponse<CompletionOutcome>),
        (status = 403, description = "Not a party"),
        (status = 409, description = "Already confirmed, or swap not accepted")
    ),
    tag = "Swaps"
)]
pub async fn complete_swap(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(swap_id): Path<i64>,
) -> Result<Json<ApiResponse<CompletionOutcome>>, ExchangeError> {
    let outcome = SwapService::complete(
        state.pool(),
        &state.rewards,
        swap_id,
        claims.user_id()?,
    )
    .await?;

    let msg = if outcome.finalized {
        "Swap completed by both parties"
    } else {
        "Completion confirmed, waiting for the other party"
    };
    Ok(Json(ApiResponse::success_with_msg(msg, outcome)))
}

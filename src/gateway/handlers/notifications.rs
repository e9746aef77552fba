//! Notification handlers (receiver-scoped)

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::ExchangeError;
use crate::gateway::{state::AppState, types::ApiResponse};
use crate::notifications::{Notification, NotificationRepository};
use crate::user_auth::Claims;

#[derive(Debug, Deserialize, ToSchema)]
pub struct MarkManyReadRequest {
    pub notification_ids: Vec<i64>,
}

/// All notifications for the caller
///
/// GET /api/v1/notifications
#[utoipa::path(
    get,
    path = "/api/v1/notifications",
    responses(
        (status = 200, description = "The caller's notifications", body = ApiResponse<Vec<Notification>>)
    ),
    tag = "Notifications"
)]
pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<Vec<Notification>>>, ExchangeError> {
    let notifications =
        NotificationRepository::list_for_user(state.pool(), claims.user_id()?).await?;
    Ok(Json(ApiResponse::success(notifications)))
}

/// Unread notifications for the caller
///
/// GET /api/v1/notifications/unread
#[utoipa::path(
    get,
    path = "/api/v1/notifications/unread",
    responses(
        (status = 200, description = "Unread notifications", body = ApiResponse<Vec<Notification>>)
    ),
    tag = "Notifications"
)]
pub async fn list_unread(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<Vec<Notification>>>, ExchangeError> {
    let notifications = NotificationRepository::list_unread(state.pool(), claims.user_id()?).await?;
    Ok(Json(ApiResponse::success(notifications)))
}

/// Mark one notification read
///
/// PUT /api/v1/notifications/{notification_id}/read
#[utoipa::path(
    put,
    path = "/api/v1/notifications/{notification_id}/read",
    params(("notification_id" = i64, Path, description = "Notification id")),
    responses(
        (status = 200, description = "Marked read"),
        (status = 404, description = "No such notification for this user")
    ),
    tag = "Notifications"
)]
pub async fn mark_notification_read(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(notification_id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, ExchangeError> {
    let marked =
        NotificationRepository::mark_read(state.pool(), notification_id, claims.user_id()?).await?;
    if !marked {
        return Err(ExchangeError::NotFound("Notification"));
    }
    Ok(Json(ApiResponse::success_with_msg(
        "Notification marked as read",
        (),
    )))
}

/// Mark a batch of notifications read
///
/// PUT /api/v1/notifications/read
#[utoipa::path(
    put,
    path = "/api/v1/notifications/read",
    request_body = MarkManyReadRequest,
    responses((status = 200, description = "Batch marked read", body = ApiResponse<u64>)),
    tag = "Notifications"
)]
pub async fn mark_many_read(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<MarkManyReadRequest>,
) -> Result<Json<ApiResponse<u64>>, ExchangeError> {
    if req.notification_ids.is_empty() {
        return Err(ExchangeError::validation("Notification IDs are required"));
    }

    let marked = NotificationRepository::mark_many_read(
        state.pool(),
        &req.notification_ids,
        claims.user_id()?,
    )
    .await?;

    Ok(Json(ApiResponse::success_with_msg(
        format!("Marked {} notifications as read", marked),
        marked,
    )))
}

/// Delete one notification
///
/// DELETE /api/v1/notifications/{notification_id}
#[utoipa::path(
    delete,
    path = "/api/v1/notifications/{notification_id}",
    params(("notification_id" = i64, Path, description = "Notification id")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "No such notification for this user")
    ),
    tag = "Notifications"
)]
pub async fn delete_notification(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(notification_id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, ExchangeError> {
    let deleted =
        NotificationRepository::delete(state.pool(), notification_id, claims.user_id()?).await?;
    if !deleted {
        return Err(ExchangeError::NotFound("Notification"));
    }
    Ok(Json(ApiResponse::success_with_msg(
        "Notification deleted",
        (),
    )))
}

use axum::{Extension, Json, extract::State, http::StatusCode};
use std::sync::Arc;

use super::service::{AuthResponse, Claims, LoginRequest, RegisterRequest};
use crate::error::ExchangeError;
use crate::gateway::{state::AppState, types::ApiResponse};
use crate::users::{UserRepository, models::UserProfile};

/// Register a new user
///
/// POST /api/v1/auth/register
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = ApiResponse<AuthResponse>),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Email already registered")
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), ExchangeError> {
    let resp = state.user_auth.register(req).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_msg(
            "User registered successfully",
            resp,
        )),
    ))
}

/// Login user
///
/// POST /api/v1/auth/login
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<AuthResponse>),
        (status = 403, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, ExchangeError> {
    let resp = state.user_auth.login(req).await?;
    Ok(Json(ApiResponse::success(resp)))
}

/// The authenticated user's profile
///
/// GET /api/v1/users/me
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "The caller's profile", body = ApiResponse<UserProfile>),
        (status = 404, description = "User no longer exists")
    ),
    tag = "Auth"
)]
pub async fn me(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<UserProfile>>, ExchangeError> {
    let user = UserRepository::get_by_id(state.pool(), claims.user_id()?)
        .await?
        .ok_or(ExchangeError::NotFound("User"))?;

    Ok(Json(ApiResponse::success(UserProfile::from(&user))))
}

//! Authentication routes
//!
//! Registration, login, token refresh and the current-user projection.
//! Malformed JSON bodies are reported as `BAD_REQUEST` in the common error
//! shape rather than axum's plain-text rejection.

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::UserService;
use crate::state::AppState;
use agrifinance_shared::{
    AuthTokens, LoginRequest, RefreshTokenRequest, RegisterRequest, UserResponse,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

/// Create auth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh_token))
        .route("/me", get(me))
}

/// POST /api/v1/auth/register
///
/// Creates the user and an attached farmer profile; returns 201 with the
/// user projection.
async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let Json(req) = payload?;
    let user = UserService::register(state.db(), state.password_policy(), req).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /api/v1/auth/login
async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<AuthTokens>> {
    let Json(req) = payload?;
    let tokens = UserService::login(state.db(), state.jwt(), req).await?;
    Ok(Json(tokens))
}

/// POST /api/v1/auth/refresh
async fn refresh_token(
    State(state): State<AppState>,
    payload: Result<Json<RefreshTokenRequest>, JsonRejection>,
) -> ApiResult<Json<AuthTokens>> {
    let Json(req) = payload?;
    let tokens = UserService::refresh_token(state.db(), state.jwt(), req).await?;
    Ok(Json(tokens))
}

/// GET /api/v1/auth/me (requires a Bearer access token)
async fn me(State(state): State<AppState>, auth_user: AuthUser) -> ApiResult<Json<UserResponse>> {
    let user = UserService::get_current_user(state.db(), auth_user.user_id).await?;
    Ok(Json(user))
}

//! Farmer profile API routes

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::ProfileService;
use crate::state::AppState;
use agrifinance_shared::{FarmerProfileResponse, UpdateFarmerProfileRequest};
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::get,
    Json, Router,
};

/// Create profile routes
pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/", get(get_profile).put(update_profile))
}

/// GET /api/v1/profile
async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<FarmerProfileResponse>> {
    let profile = ProfileService::get_profile(state.db(), auth.user_id).await?;
    Ok(Json(profile))
}

/// PUT /api/v1/profile - partial update, omitted fields are kept
async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<UpdateFarmerProfileRequest>, JsonRejection>,
) -> ApiResult<Json<FarmerProfileResponse>> {
    let Json(req) = payload?;
    let profile = ProfileService::update_profile(state.db(), auth.user_id, req).await?;
    Ok(Json(profile))
}

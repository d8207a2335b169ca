//! Profile Routes
//!
//! Direct access to stored profiles.
//!
//! - GET /api/v1/profiles - List identifying keys with a stored profile
//! - GET /api/v1/profiles/:email - Get the profile stored for an email

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::ProfileListResponse;
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::storage::PatientProfile;

/// GET /api/v1/profiles
pub async fn list_profiles(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ProfileListResponse>> {
    let keys = state.store().list_profile_keys()?;

    Ok(Json(ProfileListResponse {
        total: keys.len(),
        keys,
    }))
}

/// GET /api/v1/profiles/:email
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> ApiResult<Json<PatientProfile>> {
    state
        .store()
        .load(&email)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("No profile found for {}", email)))
}

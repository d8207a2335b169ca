//! Intake Routes
//!
//! - POST /api/v1/intake - Submit the patient-details form
//! - GET /api/v1/dashboard - Profile or completion prompt for an email

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::dto::{DashboardQuery, DashboardResponse, IntakeRequest, IntakeResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;

/// POST /api/v1/intake
///
/// Validates the form and saves the profile under the request's `email`.
/// The server never substitutes the device's signed-in user for a missing
/// email. A storage failure does not fail the request; it is reported as
/// `saved: false`.
pub async fn submit_intake(
    State(state): State<Arc<AppState>>,
    Json(req): Json<IntakeRequest>,
) -> ApiResult<(StatusCode, Json<IntakeResponse>)> {
    let form = match req.full_name.as_deref() {
        Some(full_name) => req.form.with_default_names(full_name),
        None => req.form,
    };
    let email = req.email.unwrap_or_default();

    let intake = state.intake.clone();
    let outcome = tokio::task::spawn_blocking(move || intake.submit_for(&form, &email))
        .await
        .map_err(|e| ApiError::Internal(format!("Intake task failed: {}", e)))??;

    Ok((StatusCode::CREATED, Json(outcome.into())))
}

/// GET /api/v1/dashboard?email=
///
/// Always 200: a missing profile, or a missing email, is a prompt, not an
/// error.
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DashboardQuery>,
) -> ApiResult<Json<DashboardResponse>> {
    let email = query.email.unwrap_or_default();

    let intake = state.intake.clone();
    let view = tokio::task::spawn_blocking(move || intake.dashboard_for(&email))
        .await
        .map_err(|e| ApiError::Internal(format!("Dashboard task failed: {}", e)))?;

    Ok(Json(view.into()))
}

//! Doctor Routes
//!
//! - GET /api/v1/doctors - List the doctors a patient can choose

use axum::Json;

use crate::api::dto::DoctorResponse;
use crate::doctors::DOCTORS;

/// GET /api/v1/doctors
pub async fn list_doctors() -> Json<Vec<DoctorResponse>> {
    Json(DOCTORS.iter().map(DoctorResponse::from).collect())
}

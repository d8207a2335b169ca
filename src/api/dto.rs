//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use serde::{Deserialize, Serialize};

use crate::doctors::Doctor;
use crate::intake::{DashboardView, IntakeForm, SubmitOutcome};
use crate::storage::PatientProfile;

// ============================================
// DOCTOR DTOs
// ============================================

/// Doctor as offered in the picker
#[derive(Debug, Serialize, Deserialize)]
pub struct DoctorResponse {
    pub id: String,
    pub name: String,
    pub specialty: String,
    pub label: String,
}

impl From<&Doctor> for DoctorResponse {
    fn from(doctor: &Doctor) -> Self {
        Self {
            id: doctor.id.to_string(),
            name: doctor.name.to_string(),
            specialty: doctor.specialty.to_string(),
            label: doctor.label(),
        }
    }
}

// ============================================
// INTAKE DTOs
// ============================================

/// Intake form submission
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeRequest {
    /// Email the profile is saved under; required unless anonymous intake is enabled
    #[serde(default)]
    pub email: Option<String>,
    /// Full name from sign-up, used for blank first/last names
    #[serde(default)]
    pub full_name: Option<String>,
    /// Form fields
    #[serde(flatten)]
    pub form: IntakeForm,
}

/// Intake submission result
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeResponse {
    pub profile: PatientProfile,
    /// False when the storage area refused the write
    pub saved: bool,
    /// Email to open the dashboard with
    pub dashboard_email: String,
}

impl From<SubmitOutcome> for IntakeResponse {
    fn from(outcome: SubmitOutcome) -> Self {
        Self {
            profile: outcome.profile,
            saved: outcome.saved,
            dashboard_email: outcome.dashboard_email,
        }
    }
}

// ============================================
// DASHBOARD DTOs
// ============================================

/// Dashboard query parameters
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    #[serde(default)]
    pub email: Option<String>,
}

/// Dashboard contents: either a profile or a prompt
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub display_name: String,
    pub profile: Option<PatientProfile>,
    /// Set when no profile exists; the client should offer the intake form
    pub prompt: Option<String>,
}

impl From<DashboardView> for DashboardResponse {
    fn from(view: DashboardView) -> Self {
        Self {
            display_name: view.display_name(),
            prompt: view.prompt(),
            profile: match view {
                DashboardView::Profile(profile) => Some(profile),
                DashboardView::CompleteProfile { .. } => None,
            },
        }
    }
}

// ============================================
// PROFILE DTOs
// ============================================

/// Stored profile keys
#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileListResponse {
    pub keys: Vec<String>,
    pub total: usize,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: "healthy" or "unhealthy"
    pub status: String,
    /// Storage area status
    pub storage: String,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// API version
    pub version: String,
}

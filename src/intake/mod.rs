//! Patient intake
//!
//! Ties the intake form and the dashboard to the profile store.
//!
//! - **form**: Raw form input, validation and profile construction
//! - **dashboard**: What the dashboard shows for an email
//!
//! Saving is best-effort: a storage failure is logged and the submission
//! still completes, with `saved: false` on the outcome. A profile that cannot
//! be loaded is shown as a prompt to complete the profile.

pub mod dashboard;
pub mod form;

pub use dashboard::DashboardView;
pub use form::IntakeForm;

use crate::storage::{PatientProfile, ProfileStore};
use chrono::Utc;
use thiserror::Error;

/// Reasons a submission is refused
#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("Please fill in all required fields.")]
    MissingFields,

    #[error("Invalid age: '{0}'. Must be a whole number of years")]
    InvalidAge(String),

    #[error("Invalid gender: '{0}'. Must be one of: Male, Female, Other")]
    InvalidGender(String),

    /// No sign-up email and no signed-in user, with anonymous profiles disabled
    #[error("No email to save the profile under. Sign in or sign up first")]
    MissingIdentity,
}

/// Result of a completed submission
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOutcome {
    pub profile: PatientProfile,
    /// Whether the profile reached the storage area
    pub saved: bool,
    /// Email the dashboard should be opened with
    pub dashboard_email: String,
}

/// Intake form submission and dashboard lookup over a profile store
#[derive(Clone)]
pub struct IntakeService {
    store: ProfileStore,
    allow_anonymous: bool,
}

impl IntakeService {
    pub fn new(store: ProfileStore) -> Self {
        Self {
            store,
            allow_anonymous: false,
        }
    }

    /// Save submissions without an email under the shared `anonymous` key
    pub fn allow_anonymous(mut self, allow: bool) -> Self {
        self.allow_anonymous = allow;
        self
    }

    pub fn store(&self) -> &ProfileStore {
        &self.store
    }

    /// Email a submission is saved under: the sign-up email when given,
    /// otherwise the signed-in user, otherwise empty.
    ///
    /// The signed-in user belongs to this device's storage area. Callers
    /// serving many clients pass an explicit email to [`Self::submit_for`]
    /// and [`Self::dashboard_for`] instead.
    pub fn resolve_email(&self, signup_email: Option<&str>) -> String {
        non_blank(signup_email)
            .or_else(|| self.store.current_user())
            .unwrap_or_default()
    }

    /// Validate `form` and save it under the sign-up email or the signed-in user
    pub fn submit(
        &self,
        form: &IntakeForm,
        signup_email: Option<&str>,
    ) -> Result<SubmitOutcome, IntakeError> {
        self.submit_for(form, &self.resolve_email(signup_email))
    }

    /// Validate `form` and save it under exactly `email`
    ///
    /// A blank email is refused with [`IntakeError::MissingIdentity`] unless
    /// anonymous profiles are allowed.
    pub fn submit_for(&self, form: &IntakeForm, email: &str) -> Result<SubmitOutcome, IntakeError> {
        form.validate()?;

        let email = email.trim();
        if email.is_empty() && !self.allow_anonymous {
            return Err(IntakeError::MissingIdentity);
        }

        let profile = form.into_profile(email, Utc::now())?;

        let saved = match self.store.save(email, &profile) {
            Ok(()) => {
                tracing::info!(email = %email, doctor = %profile.doctor_id, "Patient profile saved");
                true
            }
            Err(e) => {
                tracing::warn!(email = %email, error = %e, "Patient profile not saved");
                false
            }
        };

        Ok(SubmitOutcome {
            profile,
            saved,
            dashboard_email: email.to_string(),
        })
    }

    /// Dashboard for `email`, falling back to the signed-in user
    pub fn dashboard(&self, email: Option<&str>) -> DashboardView {
        let email = non_blank(email)
            .or_else(|| self.store.current_user())
            .unwrap_or_default();
        self.dashboard_for(&email)
    }

    /// Dashboard for exactly `email`; a blank email gets the prompt
    pub fn dashboard_for(&self, email: &str) -> DashboardView {
        let email = email.trim();
        if email.is_empty() {
            return DashboardView::CompleteProfile {
                email: String::new(),
            };
        }

        match self.store.load(email) {
            Some(profile) => DashboardView::Profile(profile),
            None => DashboardView::CompleteProfile {
                email: email.to_string(),
            },
        }
    }
}

fn non_blank(email: Option<&str>) -> Option<String> {
    email
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(str::to_string)
}

//! Dashboard view model
//!
//! Resolves what the dashboard shows for an email: the stored profile, or a
//! prompt to complete one when nothing usable is stored.

use crate::storage::PatientProfile;

/// What the dashboard renders
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardView {
    /// A stored profile was found
    Profile(PatientProfile),
    /// No usable profile; ask the patient to fill in the intake form
    CompleteProfile {
        /// Email the lookup was made for, empty when none was known
        email: String,
    },
}

impl DashboardView {
    /// Name used in the "Welcome, ..." heading
    pub fn display_name(&self) -> String {
        match self {
            DashboardView::Profile(profile) => profile.full_name(),
            DashboardView::CompleteProfile { email } if !email.is_empty() => email.clone(),
            DashboardView::CompleteProfile { .. } => "Patient".to_string(),
        }
    }

    pub fn profile(&self) -> Option<&PatientProfile> {
        match self {
            DashboardView::Profile(profile) => Some(profile),
            DashboardView::CompleteProfile { .. } => None,
        }
    }

    /// Message shown instead of the details when no profile exists
    pub fn prompt(&self) -> Option<String> {
        match self {
            DashboardView::Profile(_) => None,
            DashboardView::CompleteProfile { email } => {
                let who = if email.is_empty() {
                    "current user"
                } else {
                    email.as_str()
                };
                Some(format!("No profile found for {}.", who))
            }
        }
    }

    /// Labelled detail rows for a found profile
    pub fn details(&self) -> Vec<(&'static str, String)> {
        let Some(profile) = self.profile() else {
            return Vec::new();
        };

        vec![
            ("Email", profile.email.clone()),
            ("Name", format!("{} {}", profile.first_name, profile.last_name)),
            ("Age", profile.age.to_string()),
            ("Gender", profile.gender.to_string()),
            (
                "Contact No",
                profile.contact().unwrap_or("—").to_string(),
            ),
            ("Symptoms", profile.symptoms.clone()),
            (
                "Doctor",
                format!("{} ({})", profile.doctor_name, profile.doctor_specialty),
            ),
        ]
    }
}

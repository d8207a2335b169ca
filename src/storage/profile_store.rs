//! Profile Store
//!
//! Maps an identifying key (the patient's email) to a single
//! [`PatientProfile`] in a [`KeyValueStorage`] area.
//!
//! # Storage layout
//!
//! ```text
//! patientProfile:<email>      -> JSON-encoded PatientProfile
//! patientProfile:anonymous    -> profile saved with an empty email
//! currentUserEmail            -> bare email string
//! ```
//!
//! Saving overwrites: there is at most one profile per key and no history.
//! Loading never fails outward: a missing, unreadable or undecodable entry
//! is reported as "not found".

use crate::storage::backend::KeyValueStorage;
use crate::storage::error::StorageResult;
use crate::storage::types::PatientProfile;
use std::sync::Arc;

/// Prefix of every profile entry
pub const PROFILE_KEY_PREFIX: &str = "patientProfile:";

/// Key suffix used when the email is empty
pub const ANONYMOUS_KEY: &str = "anonymous";

/// Entry holding the email of the signed-in user
pub const CURRENT_USER_KEY: &str = "currentUserEmail";

/// Storage key for the profile identified by `email`
///
/// A blank email falls back to `patientProfile:anonymous`. Otherwise the
/// email is used verbatim.
pub fn profile_key(email: &str) -> String {
    if email.trim().is_empty() {
        format!("{}{}", PROFILE_KEY_PREFIX, ANONYMOUS_KEY)
    } else {
        format!("{}{}", PROFILE_KEY_PREFIX, email)
    }
}

/// Patient profile persistence over an injected storage area
#[derive(Clone)]
pub struct ProfileStore {
    storage: Arc<dyn KeyValueStorage>,
}

impl ProfileStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Serialize `profile` and write it under the entry for `key`,
    /// replacing whatever was there.
    pub fn save(&self, key: &str, profile: &PatientProfile) -> StorageResult<()> {
        let entry = profile_key(key);
        let value = serde_json::to_string(profile)?;

        self.storage.set_item(&entry, &value)?;
        tracing::debug!(key = %entry, bytes = value.len(), "Saved patient profile");
        Ok(())
    }

    /// Read the profile stored for `key`
    ///
    /// Returns `None` when nothing is stored, the area cannot be read, or the
    /// stored value does not decode as a profile.
    pub fn load(&self, key: &str) -> Option<PatientProfile> {
        let entry = profile_key(key);

        let raw = match self.storage.get_item(&entry) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!(key = %entry, "No stored profile");
                return None;
            }
            Err(e) => {
                tracing::warn!(key = %entry, error = %e, "Failed to read stored profile");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(profile) => Some(profile),
            Err(e) => {
                tracing::warn!(key = %entry, error = %e, "Stored profile is not decodable");
                None
            }
        }
    }

    /// Record `email` as the signed-in user
    pub fn set_current_user(&self, email: &str) -> StorageResult<()> {
        self.storage.set_item(CURRENT_USER_KEY, email)
    }

    /// Email of the signed-in user, if one is recorded and non-empty
    pub fn current_user(&self) -> Option<String> {
        match self.storage.get_item(CURRENT_USER_KEY) {
            Ok(value) => value.filter(|email| !email.trim().is_empty()),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read current user");
                None
            }
        }
    }

    /// Identifying keys of all stored profiles, sorted
    pub fn list_profile_keys(&self) -> StorageResult<Vec<String>> {
        Ok(self
            .storage
            .keys()?
            .into_iter()
            .filter_map(|k| k.strip_prefix(PROFILE_KEY_PREFIX).map(str::to_string))
            .collect())
    }
}

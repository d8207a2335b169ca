//! Signed-in user tracking
//!
//! A successful login or sign-up records the email as `currentUserEmail` in
//! the storage area, which is where intake and the dashboard look when no
//! email is passed to them explicitly.

use crate::auth::{AuthClient, AuthError, AuthMode, AuthNotice, Credentials};
use crate::storage::ProfileStore;

/// Sign-in flow bound to a profile store
#[derive(Clone)]
pub struct Session {
    client: AuthClient,
    store: ProfileStore,
}

impl Session {
    pub fn new(client: AuthClient, store: ProfileStore) -> Self {
        Self { client, store }
    }

    /// Validate and submit `credentials`, remembering the user on success
    ///
    /// On failure the storage area is left untouched.
    pub async fn submit(
        &self,
        mode: AuthMode,
        credentials: &Credentials,
    ) -> Result<AuthNotice, AuthError> {
        credentials.validate(mode)?;

        let notice = self.client.submit(mode, credentials).await?;

        let email = credentials.email.trim();
        if let Err(e) = self.store.set_current_user(email) {
            tracing::warn!(email = %email, error = %e, "Failed to remember signed-in user");
        } else {
            tracing::info!(email = %email, mode = mode.title(), "User signed in");
        }

        Ok(notice)
    }

    /// Email of the signed-in user
    pub fn current_user(&self) -> Option<String> {
        self.store.current_user()
    }
}

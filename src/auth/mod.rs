//! Sign-in and sign-up
//!
//! Client side of the external account service. The service itself is not
//! part of this crate; only its contract is:
//!
//! - `POST /login` with `{email, password}`
//! - `POST /signup` with `{name, email, password}`
//! - the response body is JSON carrying `message` on success or `detail` on
//!   failure
//!
//! Every failure ends up as a message for the user. Nothing is retried.

pub mod client;
pub mod session;

pub use client::{AuthClient, AuthConfig};
pub use session::Session;

use serde::Serialize;
use thiserror::Error;

/// Minimum password length accepted before contacting the service
pub const MIN_PASSWORD_LEN: usize = 6;

/// Which form the sign-in screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    Login,
    #[default]
    Signup,
}

impl AuthMode {
    /// Switch between logging in and creating an account
    pub fn toggle(self) -> Self {
        match self {
            AuthMode::Login => AuthMode::Signup,
            AuthMode::Signup => AuthMode::Login,
        }
    }

    pub fn endpoint(&self) -> &'static str {
        match self {
            AuthMode::Login => "/login",
            AuthMode::Signup => "/signup",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            AuthMode::Login => "Log In",
            AuthMode::Signup => "Create Account",
        }
    }
}

/// What the user typed on the sign-in screen
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Credentials {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn login(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: None,
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn signup(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            email: email.into(),
            password: password.into(),
        }
    }

    /// Check the fields the form marks as required
    pub fn validate(&self, mode: AuthMode) -> Result<(), AuthError> {
        if self.email.trim().is_empty() {
            return Err(AuthError::InvalidCredentials(
                "Email address is required".to_string(),
            ));
        }

        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::InvalidCredentials(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        if mode == AuthMode::Signup
            && self.name.as_deref().map(str::trim).unwrap_or("").is_empty()
        {
            return Err(AuthError::InvalidCredentials(
                "Full name is required".to_string(),
            ));
        }

        Ok(())
    }

    /// Request body for `mode`; the name is only sent on sign-up
    pub(crate) fn payload(&self, mode: AuthMode) -> Credentials {
        Credentials {
            name: match mode {
                AuthMode::Login => None,
                AuthMode::Signup => Some(self.name.clone().unwrap_or_default()),
            },
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }
}

/// Successful response from the account service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthNotice {
    pub message: String,
}

/// Errors from signing in or up
#[derive(Error, Debug)]
pub enum AuthError {
    /// Rejected locally before any request was made
    #[error("{0}")]
    InvalidCredentials(String),

    /// The service answered with a non-success status
    #[error("Rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The service could not be reached
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Client(#[source] reqwest::Error),
}

impl AuthError {
    /// Text the user is alerted with
    pub fn user_message(&self) -> String {
        match self {
            AuthError::InvalidCredentials(message) => message.clone(),
            AuthError::Rejected { message, .. } => message.clone(),
            AuthError::Network(_) | AuthError::Client(_) => "Network error".to_string(),
        }
    }
}

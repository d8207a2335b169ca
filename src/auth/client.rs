//! Account service HTTP client
//!
//! Posts credentials to the external `/login` and `/signup` endpoints.

use crate::auth::{AuthError, AuthMode, AuthNotice, Credentials};
use reqwest::Client;
use serde::Deserialize;

/// Fallback shown when a success response carries no message
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Success";

/// Fallback shown when a failure response carries no detail
pub const DEFAULT_FAILURE_MESSAGE: &str = "Something went wrong";

/// Configuration for the account service client
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Base URL of the account service (e.g., "http://localhost:8000")
    pub base_url: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            request_timeout_ms: 10_000,
        }
    }
}

/// Account service client
#[derive(Debug, Clone)]
pub struct AuthClient {
    client: Client,
    config: AuthConfig,
}

impl AuthClient {
    pub fn new(config: AuthConfig) -> Result<Self, AuthError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(AuthError::Client)?;

        Ok(Self { client, config })
    }

    fn url(&self, mode: AuthMode) -> String {
        format!(
            "{}{}",
            self.config.base_url.trim_end_matches('/'),
            mode.endpoint()
        )
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<AuthNotice, AuthError> {
        self.submit(AuthMode::Login, credentials).await
    }

    pub async fn signup(&self, credentials: &Credentials) -> Result<AuthNotice, AuthError> {
        self.submit(AuthMode::Signup, credentials).await
    }

    /// Post `credentials` to the endpoint for `mode`
    ///
    /// Does not validate the credentials; see [`Credentials::validate`].
    pub async fn submit(
        &self,
        mode: AuthMode,
        credentials: &Credentials,
    ) -> Result<AuthNotice, AuthError> {
        let url = self.url(mode);
        tracing::debug!(url = %url, email = %credentials.email, "Submitting credentials");

        let response = self
            .client
            .post(&url)
            .json(&credentials.payload(mode))
            .send()
            .await
            .map_err(AuthError::Network)?;

        let status = response.status();
        let body = response.text().await.map_err(AuthError::Network)?;
        let parsed: AuthResponseBody = serde_json::from_str(&body).unwrap_or_default();

        if status.is_success() {
            Ok(AuthNotice {
                message: parsed
                    .message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| DEFAULT_SUCCESS_MESSAGE.to_string()),
            })
        } else {
            tracing::info!(status = status.as_u16(), url = %url, "Account service rejected request");
            Err(AuthError::Rejected {
                status: status.as_u16(),
                message: parsed
                    .detail_text()
                    .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string()),
            })
        }
    }
}

// ============================================
// Response DTO
// ============================================

#[derive(Debug, Default, Deserialize)]
struct AuthResponseBody {
    #[serde(default)]
    message: Option<String>,
    /// Usually a string; validation failures send a structured list
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

impl AuthResponseBody {
    fn detail_text(&self) -> Option<String> {
        match self.detail.as_ref()? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) if s.is_empty() => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use crate::storage::{FileStorage, ProfileStore, StorageResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub intake: IntakeConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Storage area configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Maximum bytes the storage area may hold; unlimited when absent
    #[serde(default)]
    pub quota_bytes: Option<usize>,
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("drconnect").to_string_lossy().to_string())
        .unwrap_or_else(|| "./drconnect_data".to_string())
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            quota_bytes: None,
        }
    }
}

impl StorageConfig {
    pub fn data_dir(&self) -> PathBuf {
        expand_home(&self.data_dir)
    }

    /// Open the file-backed storage area and wrap it in a profile store
    pub fn open_store(&self) -> StorageResult<ProfileStore> {
        let storage = FileStorage::open(self.data_dir(), self.quota_bytes)?;
        Ok(ProfileStore::new(Arc::new(storage)))
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8090
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Account service (login/signup) configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_auth_url")]
    pub url: String,

    #[serde(default = "default_auth_timeout")]
    pub request_timeout_ms: u64,
}

fn default_auth_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_auth_timeout() -> u64 {
    10_000
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            url: default_auth_url(),
            request_timeout_ms: default_auth_timeout(),
        }
    }
}

impl AuthConfig {
    /// Client configuration for [`crate::auth::AuthClient`]
    pub fn client_config(&self) -> crate::auth::AuthConfig {
        crate::auth::AuthConfig {
            base_url: self.url.clone(),
            request_timeout_ms: self.request_timeout_ms,
        }
    }
}

/// Intake behaviour
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IntakeConfig {
    /// Save profiles submitted without any email under the shared
    /// `patientProfile:anonymous` key
    #[serde(default)]
    pub allow_anonymous: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| match e {
            ConfigError::Parse { error, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                error,
            },
            other => other,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: PathBuf::new(),
            error: e.to_string(),
        })
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("drconnect").join("config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Apply overrides from any variable source
    fn apply_overrides<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // Storage overrides
        if let Some(data_dir) = var("DRCONNECT_DATA_DIR") {
            self.storage.data_dir = data_dir;
        }
        if let Some(quota) = var("DRCONNECT_STORAGE_QUOTA") {
            match quota.parse() {
                Ok(q) => self.storage.quota_bytes = Some(q),
                Err(_) => tracing::warn!("Ignoring invalid DRCONNECT_STORAGE_QUOTA: {}", quota),
            }
        }

        // API overrides
        if let Some(host) = var("DRCONNECT_API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = var("DRCONNECT_API_PORT") {
            if let Ok(p) = port.parse() {
                self.api.port = p;
            }
        }

        // Account service overrides
        if let Some(url) = var("DRCONNECT_AUTH_URL") {
            self.auth.url = url;
        }

        // Intake overrides
        if let Some(allow) = var("DRCONNECT_ALLOW_ANONYMOUS") {
            self.intake.allow_anonymous = matches!(
                allow.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }

        // Logging overrides
        if let Some(level) = var("DRCONNECT_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("DRCONNECT_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Expand a leading `~/` to the home directory
fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(path)),
        None => PathBuf::from(path),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# DrConnect Configuration
#
# Environment variables override these settings:
# - DRCONNECT_DATA_DIR
# - DRCONNECT_STORAGE_QUOTA
# - DRCONNECT_API_HOST
# - DRCONNECT_API_PORT
# - DRCONNECT_AUTH_URL
# - DRCONNECT_ALLOW_ANONYMOUS
# - DRCONNECT_LOG_LEVEL
# - DRCONNECT_LOG_FORMAT

[storage]
# Directory holding the storage area (local_storage.json)
data_dir = "~/.local/share/drconnect"

# Maximum bytes the storage area may hold (unset = unlimited)
# quota_bytes = 5242880

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 8090

# Request timeout in seconds
request_timeout_secs = 30

[auth]
# Account service providing /login and /signup
url = "http://localhost:8000"

# Request timeout in milliseconds
request_timeout_ms = 10000

[intake]
# Save profiles submitted without an email under the shared "anonymous" key.
# Different unauthenticated users then overwrite each other's profile.
allow_anonymous = false

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_generated_config_parses_to_defaults() {
        let config = Config::parse(&generate_default_config()).unwrap();

        assert_eq!(config.api.port, 8090);
        assert_eq!(config.auth.url, "http://localhost:8000");
        assert_eq!(config.storage.quota_bytes, None);
        assert!(!config.intake.allow_anonymous);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config = Config::parse(
            r#"
            [intake]
            allow_anonymous = true

            [storage]
            data_dir = "/tmp/drconnect"
            "#,
        )
        .unwrap();

        assert!(config.intake.allow_anonymous);
        assert_eq!(config.storage.data_dir(), PathBuf::from("/tmp/drconnect"));
        assert_eq!(config.api.host, "0.0.0.0");
        assert_eq!(config.auth.request_timeout_ms, 10_000);
    }

    #[test]
    fn test_open_store_uses_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            data_dir: dir.path().to_string_lossy().to_string(),
            quota_bytes: None,
        };

        config.open_store().unwrap().set_current_user("a@x.com").unwrap();

        let reopened = config.open_store().unwrap();
        assert_eq!(reopened.current_user().as_deref(), Some("a@x.com"));
        assert!(dir.path().join("local_storage.json").exists());
    }

    #[test]
    fn test_invalid_config() {
        let err = Config::parse("[api]\nport = \"not a port\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[auth]\nurl = \"http://auth.local\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.auth.url, "http://auth.local");
        assert_eq!(config.auth.client_config().base_url, "http://auth.local");

        let err = Config::load(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("DRCONNECT_DATA_DIR", "/srv/drconnect"),
            ("DRCONNECT_STORAGE_QUOTA", "5000"),
            ("DRCONNECT_API_PORT", "9000"),
            ("DRCONNECT_AUTH_URL", "http://auth:8000"),
            ("DRCONNECT_ALLOW_ANONYMOUS", "TRUE"),
            ("DRCONNECT_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.storage.data_dir, "/srv/drconnect");
        assert_eq!(config.storage.quota_bytes, Some(5000));
        assert_eq!(config.api.port, 9000);
        assert_eq!(config.auth.url, "http://auth:8000");
        assert!(config.intake.allow_anonymous);
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_invalid_numeric_overrides_are_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|name| match name {
            "DRCONNECT_API_PORT" => Some("http".to_string()),
            "DRCONNECT_STORAGE_QUOTA" => Some("lots".to_string()),
            _ => None,
        });

        assert_eq!(config.api.port, 8090);
        assert_eq!(config.storage.quota_bytes, None);
    }
}

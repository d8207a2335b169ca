//! # DrConnect
//!
//! Patient intake for DrConnect: sign-in and sign-up against an external
//! account service, a patient-details intake form, and a dashboard that
//! renders the stored profile.
//!
//! ## Features
//!
//! - **Profile store**: one patient profile per email in a key-value storage area
//! - **Pluggable storage**: in-memory or single-file JSON storage, with optional quota
//! - **Intake rules**: required fields, doctor denormalization, name prefill
//! - **Dashboard**: stored profile, or a prompt to complete one
//! - **Account client**: `/login` and `/signup` with user-facing error messages
//!
//! ## Modules
//!
//! - [`storage`]: Storage area and profile store
//! - [`doctors`]: Static doctor directory
//! - [`intake`]: Intake form and dashboard
//! - [`auth`]: Account service client and signed-in user
//! - [`api`]: REST API server with Axum
//!
//! ## Quick Start
//!
//! ```rust
//! use drconnect::intake::{IntakeForm, IntakeService};
//! use drconnect::storage::{MemoryStorage, ProfileStore};
//! use std::sync::Arc;
//!
//! let store = ProfileStore::new(Arc::new(MemoryStorage::new()));
//! let intake = IntakeService::new(store);
//!
//! let form = IntakeForm {
//!     age: "30".to_string(),
//!     gender: "Female".to_string(),
//!     symptoms: "cough".to_string(),
//!     doctor_id: "d1".to_string(),
//!     ..IntakeForm::prefilled("Jane Doe")
//! };
//!
//! let outcome = intake.submit(&form, Some("a@x.com")).unwrap();
//! assert!(outcome.saved);
//!
//! let view = intake.dashboard(Some("a@x.com"));
//! assert_eq!(view.display_name(), "Jane Doe");
//! assert_eq!(view.profile().unwrap().doctor_name, "Dr. Alice Carter");
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod doctors;
pub mod intake;
pub mod logging;
pub mod storage;

// Re-export top-level types for convenience
pub use storage::{
    profile_key, FileStorage, Gender, KeyValueStorage, MemoryStorage, PatientProfile,
    ProfileStore, StorageError, StorageResult,
};

pub use doctors::{find_doctor, Doctor, DOCTORS};

pub use intake::{DashboardView, IntakeError, IntakeForm, IntakeService, SubmitOutcome};

pub use auth::{AuthClient, AuthError, AuthMode, AuthNotice, Credentials, Session};

pub use api::{build_router, serve, ApiConfig, ApiError, AppState};

pub use config::{
    ApiConfig as ConfigApiConfig, AuthConfig as ConfigAuthConfig, Config, ConfigError,
    IntakeConfig, LoggingConfig, StorageConfig,
};

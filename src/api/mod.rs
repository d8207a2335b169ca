//! DrConnect REST API
//!
//! HTTP API layer for patient intake, built with Axum.
//!
//! # Endpoints
//!
//! ## Doctors
//! - `GET /api/v1/doctors` - Doctors a patient can choose
//!
//! ## Intake
//! - `POST /api/v1/intake` - Submit the patient-details form
//! - `GET /api/v1/dashboard?email=` - Stored profile or completion prompt
//!
//! ## Profiles
//! - `GET /api/v1/profiles` - Identifying keys with a stored profile
//! - `GET /api/v1/profiles/:email` - Stored profile for an email
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,ignore
//! use drconnect::api::{serve, ApiConfig, AppState};
//! use drconnect::intake::IntakeService;
//! use drconnect::storage::{FileStorage, ProfileStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let storage = Arc::new(FileStorage::open("./drconnect_data", None)?);
//!     let intake = IntakeService::new(ProfileStore::new(storage));
//!     let config = ApiConfig::default();
//!
//!     serve(AppState::new(intake, config.clone()), &config).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::{ApiConfig, AppState};

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let max_body_size = state.config.max_body_size;
    let request_timeout = Duration::from_millis(state.config.request_timeout_ms);

    let api_routes = Router::new()
        .route("/doctors", get(routes::doctors::list_doctors))
        .route("/intake", post(routes::intake::submit_intake))
        .route("/dashboard", get(routes::intake::get_dashboard))
        .route("/profiles", get(routes::profiles::list_profiles))
        .route("/profiles/:email", get(routes::profiles::get_profile))
        .layer(DefaultBodyLimit::max(max_body_size));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(shared_state)
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("DrConnect API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("DrConnect API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::dto::{DashboardResponse, DoctorResponse, IntakeResponse};
    use crate::intake::IntakeService;
    use crate::storage::{KeyValueStorage, MemoryStorage, ProfileStore};
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        response::Response,
    };
    use serde::de::DeserializeOwned;
    use tower::util::ServiceExt;

    fn create_test_app() -> (Router, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        let intake = IntakeService::new(ProfileStore::new(storage.clone()));
        let router = build_router(AppState::new(intake, ApiConfig::default()));
        (router, storage)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body<T: DeserializeOwned>(response: Response) -> T {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    const JANE: &str = r#"{
        "email": "a@x.com",
        "firstName": "Jane",
        "lastName": "Doe",
        "age": "30",
        "gender": "Female",
        "contactNumber": "",
        "symptoms": "cough",
        "doctorId": "d1"
    }"#;

    #[tokio::test]
    async fn test_health_live() {
        let (app, _) = create_test_app();
        let response = app.oneshot(get("/health/live")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_ready() {
        let (app, _) = create_test_app();
        let response = app.oneshot(get("/health/ready")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_full() {
        let (app, _) = create_test_app();
        let response = app.oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value = json_body(response).await;
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_list_doctors() {
        let (app, _) = create_test_app();
        let response = app.oneshot(get("/api/v1/doctors")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let doctors: Vec<DoctorResponse> = json_body(response).await;
        assert_eq!(doctors.len(), 5);
        assert_eq!(doctors[0].id, "d1");
        assert_eq!(doctors[0].label, "Dr. Alice Carter — Cardiology");
    }

    #[tokio::test]
    async fn test_submit_intake() {
        let (app, storage) = create_test_app();
        let response = app
            .oneshot(post_json("/api/v1/intake", JANE))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let body: IntakeResponse = json_body(response).await;
        assert!(body.saved);
        assert_eq!(body.dashboard_email, "a@x.com");
        assert_eq!(body.profile.doctor_name, "Dr. Alice Carter");
        assert!(storage
            .get_item("patientProfile:a@x.com")
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_submit_intake_prefills_names() {
        let (app, _) = create_test_app();
        let body = r#"{
            "email": "a@x.com",
            "fullName": "Jane Q Public",
            "age": 41,
            "gender": "Other",
            "symptoms": "headache",
            "doctorId": "d2"
        }"#;

        let response = app
            .oneshot(post_json("/api/v1/intake", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let body: IntakeResponse = json_body(response).await;
        assert_eq!(body.profile.first_name, "Jane");
        assert_eq!(body.profile.last_name, "Q Public");
        assert_eq!(body.profile.age, 41);
    }

    #[tokio::test]
    async fn test_submit_intake_missing_fields() {
        let (app, storage) = create_test_app();
        let response = app
            .oneshot(post_json(
                "/api/v1/intake",
                r#"{"email": "a@x.com", "firstName": "Jane"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = json_body(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(storage.keys().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_submit_intake_invalid_json() {
        let (app, _) = create_test_app();
        let response = app
            .oneshot(post_json("/api/v1/intake", "not json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_dashboard_after_submit() {
        let (app, _) = create_test_app();
        app.clone()
            .oneshot(post_json("/api/v1/intake", JANE))
            .await
            .unwrap();

        let response = app
            .oneshot(get("/api/v1/dashboard?email=a%40x.com"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: DashboardResponse = json_body(response).await;
        assert_eq!(body.display_name, "Jane Doe");
        assert_eq!(body.prompt, None);
        assert_eq!(body.profile.unwrap().doctor_specialty, "Cardiology");
    }

    #[tokio::test]
    async fn test_dashboard_without_profile_prompts() {
        let (app, _) = create_test_app();
        let response = app
            .oneshot(get("/api/v1/dashboard?email=nobody%40x.com"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: DashboardResponse = json_body(response).await;
        assert!(body.profile.is_none());
        assert_eq!(
            body.prompt.as_deref(),
            Some("No profile found for nobody@x.com.")
        );
    }

    #[tokio::test]
    async fn test_intake_without_email_does_not_use_signed_in_user() {
        let (app, storage) = create_test_app();
        app.clone()
            .oneshot(post_json("/api/v1/intake", JANE))
            .await
            .unwrap();
        storage.set_item("currentUserEmail", "a@x.com").unwrap();

        let mallory = r#"{
            "firstName": "Mallory",
            "lastName": "M",
            "age": 40,
            "gender": "Other",
            "symptoms": "none",
            "doctorId": "d2"
        }"#;
        let response = app
            .clone()
            .oneshot(post_json("/api/v1/intake", mallory))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app.clone().oneshot(get("/api/v1/dashboard")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: DashboardResponse = json_body(response).await;
        assert!(body.profile.is_none());
        assert_eq!(body.display_name, "Patient");

        let response = app
            .oneshot(get("/api/v1/profiles/a@x.com"))
            .await
            .unwrap();
        let profile: serde_json::Value = json_body(response).await;
        assert_eq!(profile["firstName"], "Jane");
    }

    #[tokio::test]
    async fn test_submit_intake_accepts_null_optional_fields() {
        let (app, _) = create_test_app();
        let body = r#"{
            "email": "a@x.com",
            "fullName": null,
            "firstName": "Jane",
            "lastName": "Doe",
            "age": 30,
            "gender": "Female",
            "contactNumber": null,
            "symptoms": "cough",
            "doctorId": "d1"
        }"#;

        let response = app.oneshot(post_json("/api/v1/intake", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let body: IntakeResponse = json_body(response).await;
        assert_eq!(body.profile.contact_number, None);
    }

    #[tokio::test]
    async fn test_get_profile() {
        let (app, _) = create_test_app();
        app.clone()
            .oneshot(post_json("/api/v1/intake", JANE))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(get("/api/v1/profiles/a@x.com"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(get("/api/v1/profiles/nobody@x.com"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app.oneshot(get("/api/v1/profiles")).await.unwrap();
        let body: serde_json::Value = json_body(response).await;
        assert_eq!(body["keys"], serde_json::json!(["a@x.com"]));
    }
}

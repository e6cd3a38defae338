//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                        - Liveness
//! GET  /health/ready                  - Readiness (database ping)
//!
//! # Auth (strict rate limit)
//! POST /api/admin/login               - Admin login
//! POST /api/admin/register            - Create admin (super admin)
//! POST /api/startups/register         - Submit startup application
//! POST /api/startups/login            - Startup login (approved only)
//!
//! # Admins
//! GET    /api/admin/me                - Current admin
//! GET    /api/admins                  - List admins (super admin)
//! DELETE /api/admins/{id}             - Remove admin (super admin)
//!
//! # Startups
//! GET  /api/startups/me               - Own profile (startup)
//! PUT  /api/startups/me               - Update own profile (startup)
//! GET  /api/startups/me/schedules     - Own meetings (startup)
//! GET  /api/startups                  - List/filter/search (admin)
//! GET  /api/startups/{id}             - Detail (admin)
//! PUT  /api/startups/{id}             - Update profile (admin)
//! PATCH /api/startups/{id}/status     - Approve/reject (admin)
//! DELETE /api/startups/{id}           - Remove (admin)
//!
//! # Events / Announcements (read: any account, write: admin)
//! GET|POST /api/events                GET|PUT|DELETE /api/events/{id}
//! GET|POST /api/announcements         GET|PUT|DELETE /api/announcements/{id}
//!
//! # Schedules
//! GET|POST /api/schedules             - List (admin, ?startup_id=) / create
//! GET  /api/schedules/{id}            - Admin or owning startup
//! PUT|DELETE /api/schedules/{id}      - Admin
//!
//! # Tools
//! GET  /api/dashboard/stats           - Aggregated statistics (admin)
//! POST /api/minutes/summarize         - Minutes of meeting (admin)
//! ```

pub mod admins;
pub mod announcements;
pub mod auth;
pub mod dashboard;
pub mod events;
pub mod extract;
pub mod health;
pub mod minutes;
pub mod schedules;
pub mod startups;
pub mod validation;

use axum::Router;

use crate::db::RepositoryError;
use crate::error::AppError;
use crate::middleware::{api_rate_limiter, auth_rate_limiter};
use crate::state::AppState;

/// Every API route except health checks, without rate limiting.
fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(auth::session_router())
        .merge(admins::router())
        .merge(startups::router())
        .merge(events::router())
        .merge(announcements::router())
        .merge(schedules::router())
        .merge(dashboard::router())
        .merge(minutes::router())
}

/// Create all routes without rate limiting.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(api_routes())
}

/// Create all routes with per-client rate limits applied.
///
/// Login and registration get the strict limiter; the rest of the API gets
/// the relaxed one. Health checks are not limited.
pub fn rate_limited_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router().layer(auth_rate_limiter()))
        .merge(api_routes().layer(api_rate_limiter()))
}

/// `NotFound` error for a missing `entity`.
pub(crate) fn missing(entity: &str) -> AppError {
    AppError::NotFound(format!("{entity} not found"))
}

/// Map a repository error, naming `entity` when it was not found.
pub(crate) fn not_found_as(entity: &'static str) -> impl FnOnce(RepositoryError) -> AppError {
    move |err| match err {
        RepositoryError::NotFound => missing(entity),
        other => other.into(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr};

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use secrecy::SecretString;
    use serde_json::Value;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use incubator_core::{AccountKind, AdminRole};

    use super::*;
    use crate::config::{ApiConfig, JwtConfig};

    fn test_state() -> AppState {
        let config = ApiConfig {
            database_url: SecretString::from("postgres://localhost/incubator_test".to_string()),
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0,
            jwt: JwtConfig {
                secret: SecretString::from("q8Vn3xLr7TzK1pWmYc5HbG2sJd9FaE4u".to_string()),
                ttl_hours: 1,
            },
            cors_origins: Vec::new(),
            gemini: None,
            sentry_dsn: None,
            sentry_environment: None,
        };
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/incubator_test")
            .unwrap();
        AppState::new(config, pool).unwrap()
    }

    fn admin_token(state: &AppState, role: AdminRole) -> String {
        state
            .tokens()
            .issue(1, AccountKind::Admin, Some(role))
            .unwrap()
            .token
    }

    fn startup_token(state: &AppState) -> String {
        state
            .tokens()
            .issue(7, AccountKind::Startup, None)
            .unwrap()
            .token
    }

    async fn send(
        state: &AppState,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_owned()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = routes()
            .with_state(state.clone())
            .oneshot(request)
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    #[test]
    fn test_missing_names_entity() {
        let err = not_found_as("Event")(RepositoryError::NotFound);
        assert!(matches!(err, AppError::NotFound(ref msg) if msg == "Event not found"));

        let err = not_found_as("Event")(RepositoryError::Conflict("dup".into()));
        assert!(matches!(err, AppError::Database(RepositoryError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let state = test_state();
        let response = routes()
            .with_state(state)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_protected_routes_require_token() {
        let state = test_state();

        for (method, uri) in [
            ("GET", "/api/admin/me"),
            ("GET", "/api/startups"),
            ("GET", "/api/startups/me"),
            ("GET", "/api/events"),
            ("GET", "/api/announcements"),
            ("GET", "/api/schedules"),
            ("GET", "/api/dashboard/stats"),
            ("DELETE", "/api/admins/2"),
        ] {
            let (status, body) = send(&state, method, uri, None, None).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
            assert_eq!(body["message"], "Authentication required");
        }
    }

    #[tokio::test]
    async fn test_x_auth_token_header_is_accepted() {
        let state = test_state();
        let token = startup_token(&state);

        let response = routes()
            .with_state(state)
            .oneshot(
                Request::builder()
                    .uri("/api/dashboard/stats")
                    .header("x-auth-token", token)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        // Authenticated, but as the wrong kind of account.
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_garbage_token_is_unauthorized() {
        let state = test_state();
        let (status, body) =
            send(&state, "GET", "/api/events", Some("not-a-jwt"), None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid token");
    }

    #[tokio::test]
    async fn test_startup_cannot_use_admin_routes() {
        let state = test_state();
        let token = startup_token(&state);

        for (method, uri) in [
            ("GET", "/api/startups"),
            ("GET", "/api/dashboard/stats"),
            ("GET", "/api/schedules"),
            ("DELETE", "/api/events/1"),
        ] {
            let (status, body) = send(&state, method, uri, Some(&token), None).await;
            assert_eq!(status, StatusCode::FORBIDDEN, "{method} {uri}");
            assert_eq!(body["message"], "Admin access required");
        }
    }

    #[tokio::test]
    async fn test_admin_cannot_use_startup_routes() {
        let state = test_state();
        let token = admin_token(&state, AdminRole::Admin);

        let (status, _) = send(&state, "GET", "/api/startups/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_plain_admin_cannot_manage_admins() {
        let state = test_state();
        let token = admin_token(&state, AdminRole::Admin);

        let (status, _) = send(&state, "GET", "/api/admins", Some(&token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(
            &state,
            "POST",
            "/api/admin/register",
            Some(&token),
            Some(r#"{"name": "Sam", "email": "sam@hub.io", "password": "longenough"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_super_admin_cannot_delete_self() {
        let state = test_state();
        let token = admin_token(&state, AdminRole::SuperAdmin);

        let (status, body) = send(&state, "DELETE", "/api/admins/1", Some(&token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "You cannot delete your own account");
    }

    #[tokio::test]
    async fn test_validation_runs_before_database() {
        let state = test_state();
        let token = admin_token(&state, AdminRole::Admin);

        let (status, body) = send(
            &state,
            "POST",
            "/api/events",
            Some(&token),
            Some(r#"{"title": "   ", "starts_at": "2026-11-01T10:00:00Z"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["field"], "title");

        let (status, body) = send(
            &state,
            "POST",
            "/api/schedules",
            Some(&token),
            Some(r#"{"startup_id": 1, "meeting_date": "2026-13-01", "meeting_time": "10:00", "description": "Kickoff"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["field"], "meeting_date");
    }

    #[tokio::test]
    async fn test_registration_validation() {
        let state = test_state();

        let (status, body) = send(
            &state,
            "POST",
            "/api/startups/register",
            None,
            Some(r#"{"email": "founder@acme.io", "password": "short", "name": "Acme", "founder_name": "Ana"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["field"], "password");

        let (status, body) = send(
            &state,
            "POST",
            "/api/admin/login",
            None,
            Some(r#"{"email": "", "password": ""}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["field"], "email");
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let state = test_state();
        let token = admin_token(&state, AdminRole::Admin);

        let (status, body) =
            send(&state, "POST", "/api/announcements", Some(&token), Some("{not json")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn test_bad_path_id_is_bad_request() {
        let state = test_state();
        let token = admin_token(&state, AdminRole::Admin);

        let (status, body) = send(&state, "GET", "/api/events/abc", Some(&token), None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn test_minutes_unconfigured_is_unavailable() {
        let state = test_state();
        let token = admin_token(&state, AdminRole::Admin);

        let (status, body) = send(
            &state,
            "POST",
            "/api/minutes/summarize",
            Some(&token),
            Some(r#"{"notes": "Agreed to extend the pilot."}"#),
        )
        .await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["message"], "Minutes generation is not configured");
    }
}

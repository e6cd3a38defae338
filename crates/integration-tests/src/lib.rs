//! Integration tests for Incubator Hub.
//!
//! These tests drive a running API server over HTTP. They are `#[ignore]`d
//! by default because they need a migrated database and a live server.
//!
//! # Running Tests
//!
//! ```bash
//! # Migrate and bootstrap a super admin
//! cargo run -p incubator-cli -- migrate
//! cargo run -p incubator-cli -- admin create -e root@hub.test -n Root -r super_admin -p 'root-password'
//!
//! # Start the server, then run the ignored tests
//! cargo run -p incubator-api &
//! INCUBATOR_TEST_ADMIN_EMAIL=root@hub.test INCUBATOR_TEST_ADMIN_PASSWORD=root-password \
//!     cargo test -p incubator-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `INCUBATOR_TEST_URL` - Base URL of the server (default `http://127.0.0.1:5000`)
//! - `INCUBATOR_TEST_ADMIN_EMAIL` - Super admin email
//! - `INCUBATOR_TEST_ADMIN_PASSWORD` - Super admin password

#![allow(clippy::missing_panics_doc, clippy::unwrap_used, clippy::expect_used)]

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde_json::{Value, json};
use uuid::Uuid;

/// Password used for every startup the tests register.
pub const STARTUP_PASSWORD: &str = "integration-pass";

/// Password used for every admin the tests register.
pub const ADMIN_PASSWORD: &str = "integration-admin-pass";

/// Shared HTTP client and server location.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
}

impl TestContext {
    /// Build a context from the environment.
    #[must_use]
    pub fn new() -> Self {
        let base_url = std::env::var("INCUBATOR_TEST_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:5000".to_owned());

        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// Start a request to `path`, optionally authenticated with `token`.
    ///
    /// Each request claims a different forwarded client address so the
    /// per-IP login limiter does not throttle the suite.
    pub fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{path}", self.base_url))
            .header("x-forwarded-for", random_client_ip());
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Log in as the configured super admin and return the token.
    pub async fn admin_token(&self) -> String {
        let email = std::env::var("INCUBATOR_TEST_ADMIN_EMAIL")
            .expect("INCUBATOR_TEST_ADMIN_EMAIL must be set");
        let password = std::env::var("INCUBATOR_TEST_ADMIN_PASSWORD")
            .expect("INCUBATOR_TEST_ADMIN_PASSWORD must be set");

        let response = self
            .request(Method::POST, "/api/admin/login", None)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "admin login failed");

        token_of(response).await
    }

    /// Register an admin as `registrar_token` and log in as them.
    ///
    /// Returns `(id, token)`.
    pub async fn register_admin(&self, registrar_token: &str, email: &str, role: &str) -> (i64, String) {
        let response = self
            .request(Method::POST, "/api/admin/register", Some(registrar_token))
            .json(&json!({
                "name": "Integration Admin",
                "email": email,
                "password": ADMIN_PASSWORD,
                "role": role,
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = response.json().await.unwrap();

        let response = self
            .request(Method::POST, "/api/admin/login", None)
            .json(&json!({ "email": email, "password": ADMIN_PASSWORD }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        (body["id"].as_i64().unwrap(), token_of(response).await)
    }

    /// Register a new startup with a unique email; returns `(id, email)`.
    pub async fn register_startup(&self, sector: &str) -> (i64, String) {
        let email = unique_email("founder");

        let response = self
            .request(Method::POST, "/api/startups/register", None)
            .json(&json!({
                "email": email,
                "password": STARTUP_PASSWORD,
                "name": format!("Startup {}", Uuid::new_v4().simple()),
                "founder_name": "Integration Founder",
                "sector": sector,
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let body: Value = response.json().await.unwrap();
        assert_eq!(body["status"], "pending");
        (body["id"].as_i64().unwrap(), email)
    }

    /// Approve a startup as `admin_token`.
    pub async fn approve_startup(&self, admin_token: &str, id: i64) {
        let response = self
            .request(
                Method::PATCH,
                &format!("/api/startups/{id}/status"),
                Some(admin_token),
            )
            .json(&json!({ "status": "approved" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    /// Log in as a startup and return the response.
    pub async fn startup_login(&self, email: &str) -> Response {
        self.request(Method::POST, "/api/startups/login", None)
            .json(&json!({ "email": email, "password": STARTUP_PASSWORD }))
            .send()
            .await
            .unwrap()
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Email address that has not been used by an earlier run.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@it.example", Uuid::new_v4().simple())
}

/// A random address in the 10.0.0.0/8 private range.
fn random_client_ip() -> String {
    let [a, b, c, ..] = *Uuid::new_v4().as_bytes();
    format!("10.{a}.{b}.{c}")
}

/// Extract the `token` field from a login response.
pub async fn token_of(response: Response) -> String {
    let body: Value = response.json().await.unwrap();
    body["token"].as_str().unwrap().to_owned()
}

//! Login, registration and approval gating against a live server.

use incubator_integration_tests::{TestContext, token_of, unique_email};
use reqwest::{Method, StatusCode};
use serde_json::{Value, json};

#[tokio::test]
#[ignore = "requires a running server"]
async fn test_health() {
    let ctx = TestContext::new();

    let response = ctx.request(Method::GET, "/health", None).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = ctx.request(Method::GET, "/health/ready", None).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "requires a running server"]
async fn test_admin_login_and_me() {
    let ctx = TestContext::new();
    let token = ctx.admin_token().await;

    let response = ctx
        .request(Method::GET, "/api/admin/me", Some(&token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let me: Value = response.json().await.unwrap();
    assert_eq!(me["role"], "super_admin");
    assert!(me.get("password_hash").is_none());
}

#[tokio::test]
#[ignore = "requires a running server"]
async fn test_wrong_password_is_unauthorized() {
    let ctx = TestContext::new();

    let response = ctx
        .request(Method::POST, "/api/admin/login", None)
        .json(&json!({ "email": unique_email("nobody"), "password": "not-the-password" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Invalid credentials");
}

#[tokio::test]
#[ignore = "requires a running server"]
async fn test_startup_login_requires_approval() {
    let ctx = TestContext::new();
    let admin = ctx.admin_token().await;
    let (id, email) = ctx.register_startup("Fintech").await;

    let response = ctx.startup_login(&email).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    ctx.approve_startup(&admin, id).await;

    let response = ctx.startup_login(&email).await;
    assert_eq!(response.status(), StatusCode::OK);
    let token = token_of(response).await;

    let response = ctx
        .request(Method::GET, "/api/startups/me", Some(&token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let me: Value = response.json().await.unwrap();
    assert_eq!(me["id"], id);
    assert_eq!(me["status"], "approved");
}

#[tokio::test]
#[ignore = "requires a running server"]
async fn test_duplicate_startup_email_conflicts() {
    let ctx = TestContext::new();
    let (_, email) = ctx.register_startup("Health").await;

    let response = ctx
        .request(Method::POST, "/api/startups/register", None)
        .json(&json!({
            "email": email,
            "password": "integration-pass",
            "name": "Copycat",
            "founder_name": "Someone Else",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "requires a running server"]
async fn test_super_admin_manages_admins() {
    let ctx = TestContext::new();
    let root = ctx.admin_token().await;
    let email = unique_email("staff");

    let response = ctx
        .request(Method::POST, "/api/admin/register", Some(&root))
        .json(&json!({ "name": "Staff", "email": email, "password": "staff-password" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let staff: Value = response.json().await.unwrap();
    assert_eq!(staff["role"], "admin");

    // A plain admin cannot create admins.
    let response = ctx
        .request(Method::POST, "/api/admin/login", None)
        .json(&json!({ "email": email, "password": "staff-password" }))
        .send()
        .await
        .unwrap();
    let staff_token = token_of(response).await;

    let response = ctx
        .request(Method::GET, "/api/admins", Some(&staff_token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = ctx
        .request(
            Method::DELETE,
            &format!("/api/admins/{}", staff["id"]),
            Some(&root),
        )
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

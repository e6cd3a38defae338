//! Startup listing, search and profile updates against a live server.

use incubator_integration_tests::{TestContext, token_of};
use reqwest::{Method, StatusCode};
use serde_json::{Value, json};

#[tokio::test]
#[ignore = "requires a running server"]
async fn test_filter_by_status_and_search() {
    let ctx = TestContext::new();
    let admin = ctx.admin_token().await;
    let (id, email) = ctx.register_startup("Agritech").await;

    let response = ctx
        .request(Method::GET, "/api/startups?status=pending", Some(&admin))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let pending: Vec<Value> = response.json().await.unwrap();
    assert!(pending.iter().all(|s| s["status"] == "pending"));
    assert!(pending.iter().any(|s| s["id"] == id));

    let response = ctx
        .request(
            Method::GET,
            &format!("/api/startups?q={}", email.to_uppercase()),
            Some(&admin),
        )
        .send()
        .await
        .unwrap();
    let found: Vec<Value> = response.json().await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["id"], id);
}

#[tokio::test]
#[ignore = "requires a running server"]
async fn test_startup_updates_own_profile() {
    let ctx = TestContext::new();
    let admin = ctx.admin_token().await;
    let (id, email) = ctx.register_startup("Edtech").await;
    ctx.approve_startup(&admin, id).await;
    let token = token_of(ctx.startup_login(&email).await).await;

    let response = ctx
        .request(Method::PUT, "/api/startups/me", Some(&token))
        .json(&json!({
            "name": "Renamed Co",
            "founder_name": "Integration Founder",
            "website": "ftp://example.com",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = ctx
        .request(Method::PUT, "/api/startups/me", Some(&token))
        .json(&json!({
            "name": "Renamed Co",
            "founder_name": "Integration Founder",
            "website": "https://renamed.example",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let me: Value = response.json().await.unwrap();
    assert_eq!(me["name"], "Renamed Co");
    assert_eq!(me["status"], "approved");
}

#[tokio::test]
#[ignore = "requires a running server"]
async fn test_delete_startup() {
    let ctx = TestContext::new();
    let admin = ctx.admin_token().await;
    let (id, _) = ctx.register_startup("Cleantech").await;

    let path = format!("/api/startups/{id}");
    let response = ctx.request(Method::DELETE, &path, Some(&admin)).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = ctx.request(Method::GET, &path, Some(&admin)).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires a running server"]
async fn test_delete_startup_removes_its_meetings() {
    let ctx = TestContext::new();
    let admin = ctx.admin_token().await;
    let (id, _) = ctx.register_startup("Agritech").await;

    let response = ctx
        .request(Method::POST, "/api/schedules", Some(&admin))
        .json(&json!({
            "startup_id": id,
            "meeting_date": "2030-03-04",
            "meeting_time": "09:15",
            "description": "Onboarding",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let schedule: Value = response.json().await.unwrap();
    let schedule_path = format!("/api/schedules/{}", schedule["id"]);

    let response = ctx
        .request(Method::DELETE, &format!("/api/startups/{id}"), Some(&admin))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = ctx
        .request(Method::GET, &schedule_path, Some(&admin))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = ctx
        .request(Method::GET, &format!("/api/schedules?startup_id={id}"), Some(&admin))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let remaining: Vec<Value> = response.json().await.unwrap();
    assert!(remaining.is_empty());
}

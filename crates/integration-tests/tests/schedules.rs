//! Meeting scheduling against a live server.

use chrono::{Duration, Utc};
use incubator_integration_tests::{TestContext, token_of};
use reqwest::{Method, StatusCode};
use serde_json::{Value, json};

#[tokio::test]
#[ignore = "requires a running server"]
async fn test_unknown_startup_is_rejected() {
    let ctx = TestContext::new();
    let admin = ctx.admin_token().await;

    let response = ctx
        .request(Method::POST, "/api/schedules", Some(&admin))
        .json(&json!({
            "startup_id": i32::MAX,
            "meeting_date": "2030-01-15",
            "meeting_time": "10:00",
            "description": "Orphan meeting",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires a running server"]
async fn test_startup_sees_only_own_meetings() {
    let ctx = TestContext::new();
    let admin = ctx.admin_token().await;

    let (ours, our_email) = ctx.register_startup("Robotics").await;
    let (theirs, _) = ctx.register_startup("Robotics").await;
    ctx.approve_startup(&admin, ours).await;
    let token = token_of(ctx.startup_login(&our_email).await).await;

    let date = (Utc::now() + Duration::days(3)).date_naive().to_string();
    let mut ids = Vec::new();
    for startup_id in [ours, theirs] {
        let response = ctx
            .request(Method::POST, "/api/schedules", Some(&admin))
            .json(&json!({
                "startup_id": startup_id,
                "meeting_date": date,
                "meeting_time": "14:30",
                "description": "Mentor check-in",
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let schedule: Value = response.json().await.unwrap();
        assert_eq!(schedule["meeting_time"], "14:30:00");
        ids.push(schedule["id"].as_i64().unwrap());
    }

    let response = ctx
        .request(Method::GET, "/api/startups/me/schedules", Some(&token))
        .send()
        .await
        .unwrap();
    let mine: Vec<Value> = response.json().await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["startup_id"], ours);

    let response = ctx
        .request(Method::GET, &format!("/api/schedules/{}", ids[1]), Some(&token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = ctx
        .request(Method::GET, &format!("/api/schedules/{}", ids[0]), Some(&token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = ctx
        .request(Method::DELETE, &format!("/api/schedules/{}", ids[0]), Some(&admin))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

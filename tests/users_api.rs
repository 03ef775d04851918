mod common;

use std::collections::HashSet;

use axum::http::{Method, StatusCode};
use common::{build_file_app, build_test_app, call, signup, signup_body};
use serde_json::json;

#[tokio::test]
async fn signup_then_duplicate_is_conflict() {
    let (app, _) = build_test_app().await;

    let body = signup(&app, "alice").await;
    assert_eq!(body["name"], "alice");
    assert_eq!(body["email"], "alice@example.com");
    assert!(body["id"].is_i64());
    assert!(body.get("password").is_none());

    let (status, body) = call(&app, Method::POST, "/signup", None, Some(signup_body("alice"))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "User already exists");
}

#[tokio::test]
async fn duplicate_email_under_new_name_is_conflict() {
    let (app, _) = build_test_app().await;
    signup(&app, "alice").await;

    let payload = json!({
        "name": "alicia",
        "email": "alice@example.com",
        "password": "password123",
    });
    let (status, _) = call(&app, Method::POST, "/signup", None, Some(payload)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn soft_deleted_name_stays_taken() {
    let (app, _) = build_test_app().await;
    signup(&app, "alice").await;
    let (status, _) = call(&app, Method::DELETE, "/alice", Some("alice"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = call(&app, Method::POST, "/signup", None, Some(signup_body("alice"))).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn signup_validation_lists_every_field() {
    let (app, _) = build_test_app().await;

    let payload = json!({ "name": "", "email": "not-an-email", "password": "short" });
    let (status, body) = call(&app, Method::POST, "/signup", None, Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["email", "name", "password"]);
}

#[tokio::test]
async fn malformed_json_is_400() {
    let (app, _) = build_test_app().await;

    let (status, body) = call(&app, Method::POST, "/signup", None, Some(json!({ "name": 42 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn login_issues_mock_token() {
    let (app, _) = build_test_app().await;
    signup(&app, "kyota").await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/login",
        None,
        Some(json!({ "name": "kyota", "password": "password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token"], "mock-token-for-kyota");

    let (status, body) = call(
        &app,
        Method::POST,
        "/login",
        None,
        Some(json!({ "name": "kyota", "password": "wrongpass" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid credentials");

    let (status, _) = call(
        &app,
        Method::POST,
        "/login",
        None,
        Some(json!({ "name": "nobody", "password": "password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn get_and_update_own_profile() {
    let (app, _) = build_test_app().await;
    signup(&app, "alice").await;
    signup(&app, "bob").await;

    let (status, body) = call(&app, Method::GET, "/alice", Some("alice"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "alice");

    let (status, body) = call(
        &app,
        Method::PATCH,
        "/alice",
        Some("alice"),
        Some(json!({ "name": "alice", "email": "alice@work.example" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "alice@work.example");

    let (status, _) = call(
        &app,
        Method::PATCH,
        "/alice",
        Some("alice"),
        Some(json!({ "name": "bob", "email": "alice@work.example" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_signups_with_one_name_yield_one_success() {
    let (app, _, _dir) = build_file_app().await;

    let mut handles = Vec::new();
    for i in 0..8 {
        let app = app.clone();
        handles.push(tokio::spawn(async move {
            let payload = json!({
                "name": "racer",
                "email": format!("racer{i}@example.com"),
                "password": "password123",
            });
            call(&app, Method::POST, "/signup", None, Some(payload)).await.0
        }));
    }

    let mut statuses = Vec::new();
    for handle in handles {
        statuses.push(handle.await.unwrap());
    }

    let created = statuses.iter().filter(|s| **s == StatusCode::CREATED).count();
    assert_eq!(created, 1);
    let others: HashSet<_> = statuses
        .iter()
        .filter(|s| **s != StatusCode::CREATED)
        .collect();
    assert_eq!(others, HashSet::from([&StatusCode::CONFLICT]));
}

//! Credential checks and reserved path segments on the `/{user}` routes.

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use common::{body_json, build_test_app, call, create_project, signup};
use tower::ServiceExt;

async fn get_with_header(app: &axum::Router, uri: &str, value: Option<&str>) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(value) = value {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    let response = app
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    (status, body_json(response).await)
}

#[tokio::test]
async fn missing_header_is_401() {
    let (app, _) = build_test_app().await;
    signup(&app, "alice").await;

    let (status, body) = get_with_header(&app, "/alice", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Authorization header required");
}

#[tokio::test]
async fn malformed_tokens_are_401() {
    let (app, _) = build_test_app().await;
    signup(&app, "alice").await;

    for value in ["alice", "Bearer alice", "Bearer mock-token-for-", "Token mock-token-for-alice"] {
        let (status, body) = get_with_header(&app, "/alice", Some(value)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{value}");
        assert_eq!(body["error"], "Invalid token format");
    }
}

#[tokio::test]
async fn other_users_resources_are_403() {
    let (app, _) = build_test_app().await;
    signup(&app, "alice").await;
    signup(&app, "bob").await;
    create_project(&app, "alice", "Site").await;

    for uri in ["/alice", "/alice/projects", "/alice/projects/1", "/alice/projects/1/tasks"] {
        let (status, body) = call(&app, Method::GET, uri, Some("bob"), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{uri}");
        assert_eq!(body["error"], "You are not authorized to access this resource");
    }

    let (status, _) = call(&app, Method::DELETE, "/alice/projects/1", Some("bob"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = call(&app, Method::GET, "/alice/projects/1", Some("alice"), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn reserved_segments_are_not_user_names() {
    let (app, _) = build_test_app().await;

    let (status, body) = call(&app, Method::GET, "/admin", Some("admin"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Route not found");

    for uri in ["/login/projects", "/health/projects/1", "/admin/projects/1/tasks"] {
        let (status, _) = call(&app, Method::GET, uri, Some("admin"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
    }

    // Checked before the credential.
    let (status, body) = get_with_header(&app, "/admin", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Route not found");
}

#[tokio::test]
async fn fixed_routes_still_answer() {
    let (app, _) = build_test_app().await;

    let (status, body) = call(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["db_healthy"], true);

    let (status, body) = call(&app, Method::GET, "/admin/users", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn valid_token_for_deleted_user_is_404() {
    let (app, _) = build_test_app().await;
    signup(&app, "alice").await;

    let (status, _) = call(&app, Method::DELETE, "/alice", Some("alice"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = call(&app, Method::GET, "/alice", Some("alice"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");
}

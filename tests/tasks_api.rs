mod common;

use axum::http::{Method, StatusCode};
use common::{build_file_app, build_test_app, call, create_project, create_task, signup, task_body};
use serde_json::json;

async fn alice_with_project() -> axum::Router {
    let (app, _) = build_test_app().await;
    signup(&app, "alice").await;
    create_project(&app, "alice", "Site").await;
    app
}

#[tokio::test]
async fn tasks_are_numbered_per_project() {
    let (app, _) = build_test_app().await;
    signup(&app, "alice").await;
    create_project(&app, "alice", "Site").await;
    create_project(&app, "alice", "App").await;

    assert_eq!(create_task(&app, "alice", 1, "a").await["task_id"], 1);
    assert_eq!(create_task(&app, "alice", 1, "b").await["task_id"], 2);
    assert_eq!(create_task(&app, "alice", 2, "c").await["task_id"], 1);
}

#[tokio::test]
async fn task_round_trip() {
    let app = alice_with_project().await;
    create_task(&app, "alice", 1, "Markup").await;

    let (status, body) = call(&app, Method::GET, "/alice/projects/1/tasks/1", Some("alice"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Markup");
    assert_eq!(body["status"], "Todo");
    assert_eq!(body["priority"], "High");
    assert_eq!(body["due_date"], "2025-05-20");
}

#[tokio::test]
async fn task_in_missing_project_is_404() {
    let app = alice_with_project().await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/alice/projects/7/tasks",
        Some("alice"),
        Some(task_body("Lost")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Project not found");

    let (status, body) = call(&app, Method::GET, "/alice/projects/1/tasks/5", Some("alice"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Task not found");
}

#[tokio::test]
async fn invalid_enums_and_ids_are_400() {
    let app = alice_with_project().await;

    let mut payload = task_body("Markup");
    payload["priority"] = json!("Urgent");
    payload["status"] = json!("Blocked");
    let (status, body) = call(&app, Method::POST, "/alice/projects/1/tasks", Some("alice"), Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["priority", "status"]);

    let (status, body) = call(&app, Method::GET, "/alice/projects/1/tasks/x", Some("alice"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Task ID is invalid");

    // A rejected create consumes no number.
    assert_eq!(create_task(&app, "alice", 1, "Markup").await["task_id"], 1);
}

#[tokio::test]
async fn empty_description_is_rejected() {
    let app = alice_with_project().await;

    let mut payload = task_body("Markup");
    payload["description"] = json!("");
    let (status, body) = call(&app, Method::POST, "/alice/projects/1/tasks", Some("alice"), Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "description");
}

#[tokio::test]
async fn patch_and_delete_task() {
    let app = alice_with_project().await;
    create_task(&app, "alice", 1, "Markup").await;
    create_task(&app, "alice", 1, "Styles").await;

    let (status, body) = call(
        &app,
        Method::PATCH,
        "/alice/projects/1/tasks/1",
        Some("alice"),
        Some(json!({ "status": "Done", "priority": "Low" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Done");
    assert_eq!(body["priority"], "Low");
    assert_eq!(body["title"], "Markup");

    let (status, _) = call(&app, Method::DELETE, "/alice/projects/1/tasks/1", Some("alice"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, list) = call(&app, Method::GET, "/alice/projects/1/tasks", Some("alice"), None).await;
    let numbers: Vec<i64> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["task_id"].as_i64().unwrap())
        .collect();
    assert_eq!(numbers, vec![2]);

    assert_eq!(create_task(&app, "alice", 1, "Scripts").await["task_id"], 3);
}

#[tokio::test]
async fn deleting_the_user_hides_everything() {
    let app = alice_with_project().await;
    create_task(&app, "alice", 1, "Markup").await;

    let (status, _) = call(&app, Method::DELETE, "/alice", Some("alice"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = call(&app, Method::GET, "/alice/projects/1/tasks/1", Some("alice"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, projects) = call(&app, Method::GET, "/admin/projects", None, None).await;
    let (_, tasks) = call(&app, Method::GET, "/admin/tasks", None, None).await;
    assert!(projects[0]["deleted_at"].is_string());
    assert!(tasks[0]["deleted_at"].is_string());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_task_creates_get_contiguous_numbers() {
    let (app, _, _dir) = build_file_app().await;
    signup(&app, "alice").await;
    create_project(&app, "alice", "Site").await;

    let mut handles = Vec::new();
    for i in 0..8 {
        let app = app.clone();
        handles.push(tokio::spawn(async move {
            create_task(&app, "alice", 1, &format!("T{i}")).await["task_id"]
                .as_i64()
                .unwrap()
        }));
    }

    let mut numbers = Vec::new();
    for handle in handles {
        numbers.push(handle.await.unwrap());
    }
    numbers.sort_unstable();
    assert_eq!(numbers, (1..=8).collect::<Vec<_>>());
}

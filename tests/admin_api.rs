mod common;

use axum::http::{Method, StatusCode};
use common::{build_test_app, call, create_project, create_task, signup};

#[tokio::test]
async fn lists_include_soft_deleted_rows_with_internal_ids() {
    let (app, _) = build_test_app().await;
    signup(&app, "alice").await;
    create_project(&app, "alice", "Site").await;
    create_project(&app, "alice", "App").await;
    call(&app, Method::DELETE, "/alice/projects/1", Some("alice"), None).await;

    let (status, users) = call(&app, Method::GET, "/admin/users", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users[0]["name"], "alice");
    assert!(users[0]["deleted_at"].is_null());
    assert!(users[0].get("password").is_none());

    let (_, projects) = call(&app, Method::GET, "/admin/projects", None, None).await;
    let projects = projects.as_array().unwrap().clone();
    assert_eq!(projects.len(), 2);
    assert_eq!(projects[0]["user_id"], users[0]["id"]);
    assert_eq!(projects[0]["project_id"], 1);
    assert!(projects[0]["deleted_at"].is_string());
    assert!(projects[1]["deleted_at"].is_null());
}

#[tokio::test]
async fn hard_deleting_a_project_removes_its_tasks() {
    let (app, _) = build_test_app().await;
    signup(&app, "alice").await;
    let project = create_project(&app, "alice", "Site").await;
    create_project(&app, "alice", "Other").await;
    create_task(&app, "alice", 1, "a").await;
    create_task(&app, "alice", 1, "b").await;
    create_task(&app, "alice", 2, "c").await;
    assert_eq!(project["project_id"], 1);

    let (_, projects) = call(&app, Method::GET, "/admin/projects", None, None).await;
    let id = projects[0]["id"].as_i64().unwrap();

    let (status, _) = call(&app, Method::DELETE, &format!("/admin/projects/{id}"), None, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, tasks) = call(&app, Method::GET, "/admin/tasks", None, None).await;
    let tasks = tasks.as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["title"], "c");

    let (status, body) = call(&app, Method::DELETE, &format!("/admin/projects/{id}"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Project not found");
}

#[tokio::test]
async fn hard_deleting_a_user_erases_the_subtree() {
    let (app, _) = build_test_app().await;
    signup(&app, "alice").await;
    signup(&app, "bob").await;
    create_project(&app, "alice", "Site").await;
    create_task(&app, "alice", 1, "a").await;
    create_project(&app, "bob", "Mine").await;

    let (_, users) = call(&app, Method::GET, "/admin/users", None, None).await;
    let alice_id = users[0]["id"].as_i64().unwrap();

    let (status, _) = call(&app, Method::DELETE, &format!("/admin/users/{alice_id}"), None, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, users) = call(&app, Method::GET, "/admin/users", None, None).await;
    let (_, projects) = call(&app, Method::GET, "/admin/projects", None, None).await;
    let (_, tasks) = call(&app, Method::GET, "/admin/tasks", None, None).await;
    assert_eq!(users.as_array().unwrap().len(), 1);
    assert_eq!(projects.as_array().unwrap().len(), 1);
    assert!(tasks.as_array().unwrap().is_empty());

    // The name is free again once the row is gone.
    signup(&app, "alice").await;
}

#[tokio::test]
async fn hard_delete_task_and_bad_ids() {
    let (app, _) = build_test_app().await;
    signup(&app, "alice").await;
    create_project(&app, "alice", "Site").await;
    create_task(&app, "alice", 1, "a").await;

    let (_, tasks) = call(&app, Method::GET, "/admin/tasks", None, None).await;
    let id = tasks[0]["id"].as_i64().unwrap();

    let (status, _) = call(&app, Method::DELETE, &format!("/admin/tasks/{id}"), None, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = call(&app, Method::DELETE, &format!("/admin/tasks/{id}"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Task not found");

    let (status, body) = call(&app, Method::DELETE, "/admin/users/abc", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "User ID is invalid");
}

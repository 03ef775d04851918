#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tempfile::TempDir;
use serde_json::{json, Value};
use tower::ServiceExt;

use worktrack::routes::create_routes;
use worktrack::state::AppState;

/// Fresh, migrated in-memory SQLite state. One pooled connection keeps every
/// query on the same in-memory database.
pub async fn test_state() -> AppState {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);

    AppState::new(migrated(opt).await)
}

/// Migrated SQLite file with a multi-connection pool, so concurrent requests
/// really run side by side. Keep the returned dir alive for the test.
pub async fn file_state() -> (AppState, TempDir) {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("worktrack.db").display());

    let mut opt = ConnectOptions::new(url);
    opt.max_connections(8).sqlx_logging(false);

    (AppState::new(migrated(opt).await), dir)
}

async fn migrated(opt: ConnectOptions) -> DatabaseConnection {
    let db = Database::connect(opt)
        .await
        .expect("sqlite should open");
    Migrator::up(&db, None)
        .await
        .expect("migrations should apply");
    db
}

pub async fn build_test_app() -> (Router, AppState) {
    let state = test_state().await;
    (create_routes(state.clone()), state)
}

pub async fn build_file_app() -> (Router, AppState, TempDir) {
    let (state, dir) = file_state().await;
    (create_routes(state.clone()), state, dir)
}

pub fn bearer(name: &str) -> String {
    format!("Bearer mock-token-for-{name}")
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    auth: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(name) = auth {
        builder = builder.header(header::AUTHORIZATION, bearer(name));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap()
}

/// Sends the request and returns status plus parsed body.
pub async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    auth: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let response = send(app, method, uri, auth, body).await;
    let status = response.status();
    (status, body_json(response).await)
}

pub fn signup_body(name: &str) -> Value {
    json!({
        "name": name,
        "email": format!("{name}@example.com"),
        "password": "password123",
    })
}

pub fn project_body(title: &str) -> Value {
    json!({
        "title": title,
        "description": "Renewal of the corporate site",
        "platform": "Web",
        "client": "Acme",
        "estimated_fee": 1200.5,
        "status": "InProgress",
        "deadline": "2025-05-31",
    })
}

pub fn task_body(title: &str) -> Value {
    json!({
        "title": title,
        "description": "Write the markup",
        "status": "Todo",
        "priority": "High",
        "due_date": "2025-05-20",
    })
}

pub async fn signup(app: &Router, name: &str) -> Value {
    let (status, body) = call(app, Method::POST, "/signup", None, Some(signup_body(name))).await;
    assert_eq!(status, StatusCode::CREATED, "signup {name}: {body}");
    body
}

pub async fn create_project(app: &Router, user: &str, title: &str) -> Value {
    let (status, body) = call(
        app,
        Method::POST,
        &format!("/{user}/projects"),
        Some(user),
        Some(project_body(title)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create project: {body}");
    body
}

pub async fn create_task(app: &Router, user: &str, project: i64, title: &str) -> Value {
    let (status, body) = call(
        app,
        Method::POST,
        &format!("/{user}/projects/{project}/tasks"),
        Some(user),
        Some(task_body(title)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create task: {body}");
    body
}

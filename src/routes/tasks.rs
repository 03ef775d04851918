use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entities::task::{self, TaskPriority, TaskStatus};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::repositories::{TaskDraft, TaskPatch};
use crate::state::AppState;
use crate::validation::{parse_date, parse_id, parse_optional_date, ValidatedJson};

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[validate(length(min = 1, max = 1000))]
    pub description: String,
    #[validate(custom(function = "crate::validation::task_status"))]
    #[schema(value_type = TaskStatus)]
    pub status: String,
    #[validate(custom(function = "crate::validation::task_priority"))]
    #[schema(value_type = TaskPriority)]
    pub priority: String,
    #[schema(format = Date, example = "2025-05-31")]
    pub due_date: String,
}

#[derive(Debug, Default, Deserialize, Validate, utoipa::ToSchema)]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, max = 100))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 1000))]
    pub description: Option<String>,
    #[validate(custom(function = "crate::validation::task_status"))]
    #[schema(value_type = Option<TaskStatus>)]
    pub status: Option<String>,
    #[validate(custom(function = "crate::validation::task_priority"))]
    #[schema(value_type = Option<TaskPriority>)]
    pub priority: Option<String>,
    #[schema(format = Date, example = "2025-05-31")]
    pub due_date: Option<String>,
}

impl CreateTaskRequest {
    fn into_draft(self) -> AppResult<TaskDraft> {
        Ok(TaskDraft {
            due_date: parse_date(&self.due_date)?,
            status: self.status.parse()?,
            priority: self.priority.parse()?,
            title: self.title,
            description: self.description,
        })
    }
}

impl UpdateTaskRequest {
    fn into_patch(self) -> AppResult<TaskPatch> {
        Ok(TaskPatch {
            due_date: parse_optional_date(self.due_date.as_deref())?,
            status: self.status.as_deref().map(str::parse::<TaskStatus>).transpose()?,
            priority: self
                .priority
                .as_deref()
                .map(str::parse::<TaskPriority>)
                .transpose()?,
            title: self.title,
            description: self.description,
        })
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct TaskResponse {
    /// Per-project sequential number.
    pub task_id: i32,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<task::Model> for TaskResponse {
    fn from(task: task::Model) -> Self {
        TaskResponse {
            task_id: task.number,
            title: task.title,
            description: task.description,
            status: task.status,
            priority: task.priority,
            due_date: task.due_date,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

fn numbers(project_id: &str, task_id: &str) -> AppResult<(i32, i32)> {
    Ok((parse_id(project_id, "Project")?, parse_id(task_id, "Task")?))
}

#[utoipa::path(
    post,
    path = "/{user}/projects/{project_id}/tasks",
    params(
        ("user" = String, Path, description = "User name"),
        ("project_id" = i32, Path, description = "Project number")
    ),
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created", body = TaskResponse),
        (status = 400, description = "Invalid request body, id or date"),
        (status = 404, description = "Project not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Tasks"
)]
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path((_user, project_id)): Path<(String, String)>,
    ValidatedJson(payload): ValidatedJson<CreateTaskRequest>,
) -> AppResult<(StatusCode, Json<TaskResponse>)> {
    let project_number = parse_id(&project_id, "Project")?;
    let draft = payload.into_draft()?;

    let created = state
        .tasks
        .create(&auth_user.name, project_number, draft)
        .await
        .map_err(AppError::from_repo("Project"))?;

    Ok((StatusCode::CREATED, Json(TaskResponse::from(created))))
}

#[utoipa::path(
    get,
    path = "/{user}/projects/{project_id}/tasks",
    params(
        ("user" = String, Path, description = "User name"),
        ("project_id" = i32, Path, description = "Project number")
    ),
    responses(
        (status = 200, description = "Live tasks ordered by number", body = [TaskResponse]),
        (status = 400, description = "Project ID is invalid"),
        (status = 404, description = "Project not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Tasks"
)]
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path((_user, project_id)): Path<(String, String)>,
) -> AppResult<Json<Vec<TaskResponse>>> {
    let project_number = parse_id(&project_id, "Project")?;

    let tasks = state
        .tasks
        .find_all(&auth_user.name, project_number)
        .await
        .map_err(AppError::from_repo("Project"))?;

    Ok(Json(tasks.into_iter().map(TaskResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/{user}/projects/{project_id}/tasks/{task_id}",
    params(
        ("user" = String, Path, description = "User name"),
        ("project_id" = i32, Path, description = "Project number"),
        ("task_id" = i32, Path, description = "Task number")
    ),
    responses(
        (status = 200, description = "Task details", body = TaskResponse),
        (status = 400, description = "Project or task ID is invalid"),
        (status = 404, description = "Task not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Tasks"
)]
pub async fn get_task(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path((_user, project_id, task_id)): Path<(String, String, String)>,
) -> AppResult<Json<TaskResponse>> {
    let (project_number, task_number) = numbers(&project_id, &task_id)?;

    let task = state
        .tasks
        .find(&auth_user.name, project_number, task_number)
        .await
        .map_err(AppError::from_repo("Task"))?;

    Ok(Json(TaskResponse::from(task)))
}

#[utoipa::path(
    patch,
    path = "/{user}/projects/{project_id}/tasks/{task_id}",
    params(
        ("user" = String, Path, description = "User name"),
        ("project_id" = i32, Path, description = "Project number"),
        ("task_id" = i32, Path, description = "Task number")
    ),
    request_body = UpdateTaskRequest,
    responses(
        (status = 200, description = "Task updated", body = TaskResponse),
        (status = 400, description = "Invalid request body, id or date"),
        (status = 404, description = "Task not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Tasks"
)]
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path((_user, project_id, task_id)): Path<(String, String, String)>,
    ValidatedJson(payload): ValidatedJson<UpdateTaskRequest>,
) -> AppResult<Json<TaskResponse>> {
    let (project_number, task_number) = numbers(&project_id, &task_id)?;
    let patch = payload.into_patch()?;

    let updated = state
        .tasks
        .update(&auth_user.name, project_number, task_number, patch)
        .await
        .map_err(AppError::from_repo("Task"))?;

    Ok(Json(TaskResponse::from(updated)))
}

#[utoipa::path(
    delete,
    path = "/{user}/projects/{project_id}/tasks/{task_id}",
    params(
        ("user" = String, Path, description = "User name"),
        ("project_id" = i32, Path, description = "Project number"),
        ("task_id" = i32, Path, description = "Task number")
    ),
    responses(
        (status = 204, description = "Task soft-deleted"),
        (status = 400, description = "Project or task ID is invalid"),
        (status = 404, description = "Task not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Tasks"
)]
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path((_user, project_id, task_id)): Path<(String, String, String)>,
) -> AppResult<StatusCode> {
    let (project_number, task_number) = numbers(&project_id, &task_id)?;

    state
        .tasks
        .soft_delete(&auth_user.name, project_number, task_number)
        .await
        .map_err(AppError::from_repo("Task"))?;

    Ok(StatusCode::NO_CONTENT)
}

//! Owner-scope views: every row including soft-deleted ones, and hard deletes
//! addressed by internal id.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::entities::project::{self, ProjectStatus};
use crate::entities::task::{self, TaskPriority, TaskStatus};
use crate::entities::user;
use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::validation::parse_id;

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UserForOwnerResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<user::Model> for UserForOwnerResponse {
    fn from(user: user::Model) -> Self {
        UserForOwnerResponse {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
            updated_at: user.updated_at,
            deleted_at: user.deleted_at,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ProjectForOwnerResponse {
    pub id: i32,
    pub user_id: i32,
    pub project_id: i32,
    pub title: String,
    pub description: String,
    pub platform: String,
    pub client: String,
    pub estimated_fee: f64,
    pub status: ProjectStatus,
    pub deadline: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<project::Model> for ProjectForOwnerResponse {
    fn from(project: project::Model) -> Self {
        ProjectForOwnerResponse {
            id: project.id,
            user_id: project.user_id,
            project_id: project.number,
            title: project.title,
            description: project.description,
            platform: project.platform,
            client: project.client,
            estimated_fee: project.estimated_fee,
            status: project.status,
            deadline: project.deadline,
            created_at: project.created_at,
            updated_at: project.updated_at,
            deleted_at: project.deleted_at,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct TaskForOwnerResponse {
    pub id: i32,
    /// Internal id of the parent project.
    pub project_id: i32,
    pub task_id: i32,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<task::Model> for TaskForOwnerResponse {
    fn from(task: task::Model) -> Self {
        TaskForOwnerResponse {
            id: task.id,
            project_id: task.project_id,
            task_id: task.number,
            title: task.title,
            description: task.description,
            status: task.status,
            priority: task.priority,
            due_date: task.due_date,
            created_at: task.created_at,
            updated_at: task.updated_at,
            deleted_at: task.deleted_at,
        }
    }
}

#[utoipa::path(
    get,
    path = "/admin/users",
    responses((status = 200, description = "Every user", body = [UserForOwnerResponse])),
    tag = "Admin"
)]
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<UserForOwnerResponse>>> {
    let users = state.users.find_all().await?;
    Ok(Json(users.into_iter().map(UserForOwnerResponse::from).collect()))
}

#[utoipa::path(
    delete,
    path = "/admin/users/{id}",
    params(("id" = i32, Path, description = "Internal user id")),
    responses(
        (status = 204, description = "User and everything it owns erased"),
        (status = 400, description = "User ID is invalid"),
        (status = 404, description = "User not found")
    ),
    tag = "Admin"
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_id(&id, "User")?;
    state
        .users
        .hard_delete(id)
        .await
        .map_err(AppError::from_repo("User"))?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/admin/projects",
    responses((status = 200, description = "Every project", body = [ProjectForOwnerResponse])),
    tag = "Admin"
)]
pub async fn list_projects(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ProjectForOwnerResponse>>> {
    let projects = state.projects.find_all_for_owner().await?;
    Ok(Json(projects.into_iter().map(ProjectForOwnerResponse::from).collect()))
}

#[utoipa::path(
    delete,
    path = "/admin/projects/{id}",
    params(("id" = i32, Path, description = "Internal project id")),
    responses(
        (status = 204, description = "Project and its tasks erased"),
        (status = 400, description = "Project ID is invalid"),
        (status = 404, description = "Project not found")
    ),
    tag = "Admin"
)]
pub async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_id(&id, "Project")?;
    state
        .projects
        .hard_delete(id)
        .await
        .map_err(AppError::from_repo("Project"))?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/admin/tasks",
    responses((status = 200, description = "Every task", body = [TaskForOwnerResponse])),
    tag = "Admin"
)]
pub async fn list_tasks(State(state): State<AppState>) -> AppResult<Json<Vec<TaskForOwnerResponse>>> {
    let tasks = state.tasks.find_all_for_owner().await?;
    Ok(Json(tasks.into_iter().map(TaskForOwnerResponse::from).collect()))
}

#[utoipa::path(
    delete,
    path = "/admin/tasks/{id}",
    params(("id" = i32, Path, description = "Internal task id")),
    responses(
        (status = 204, description = "Task erased"),
        (status = 400, description = "Task ID is invalid"),
        (status = 404, description = "Task not found")
    ),
    tag = "Admin"
)]
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_id(&id, "Task")?;
    state
        .tasks
        .hard_delete(id)
        .await
        .map_err(AppError::from_repo("Task"))?;
    Ok(StatusCode::NO_CONTENT)
}

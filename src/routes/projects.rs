use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entities::project::{self, ProjectStatus};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::repositories::{ProjectDraft, ProjectPatch};
use crate::state::AppState;
use crate::validation::{parse_date, parse_id, parse_optional_date, ValidatedJson};

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub description: String,
    #[validate(length(min = 1, max = 50))]
    pub platform: String,
    #[validate(length(min = 1, max = 50))]
    pub client: String,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub estimated_fee: f64,
    #[validate(custom(function = "crate::validation::project_status"))]
    #[schema(value_type = ProjectStatus)]
    pub status: String,
    #[schema(format = Date, example = "2025-05-31")]
    pub deadline: String,
}

#[derive(Debug, Default, Deserialize, Validate, utoipa::ToSchema)]
pub struct UpdateProjectRequest {
    #[validate(length(min = 1, max = 100))]
    pub title: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub platform: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub client: Option<String>,
    #[validate(range(min = 0.0))]
    pub estimated_fee: Option<f64>,
    #[validate(custom(function = "crate::validation::project_status"))]
    #[schema(value_type = Option<ProjectStatus>)]
    pub status: Option<String>,
    #[schema(format = Date, example = "2025-05-31")]
    pub deadline: Option<String>,
}

impl CreateProjectRequest {
    fn into_draft(self) -> AppResult<ProjectDraft> {
        Ok(ProjectDraft {
            deadline: parse_date(&self.deadline)?,
            status: self.status.parse()?,
            title: self.title,
            description: self.description,
            platform: self.platform,
            client: self.client,
            estimated_fee: self.estimated_fee,
        })
    }
}

impl UpdateProjectRequest {
    fn into_patch(self) -> AppResult<ProjectPatch> {
        Ok(ProjectPatch {
            deadline: parse_optional_date(self.deadline.as_deref())?,
            status: self.status.as_deref().map(str::parse::<ProjectStatus>).transpose()?,
            title: self.title,
            description: self.description,
            platform: self.platform,
            client: self.client,
            estimated_fee: self.estimated_fee,
        })
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ProjectResponse {
    /// Per-user sequential number.
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
}

impl From<project::Model> for ProjectResponse {
    fn from(project: project::Model) -> Self {
        ProjectResponse {
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
        }
    }
}

fn project_number(raw: &str) -> AppResult<i32> {
    parse_id(raw, "Project")
}

#[utoipa::path(
    post,
    path = "/{user}/projects",
    params(("user" = String, Path, description = "User name")),
    request_body = CreateProjectRequest,
    responses(
        (status = 201, description = "Project created", body = ProjectResponse),
        (status = 400, description = "Invalid request body or date"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Projects"
)]
pub async fn create_project(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ValidatedJson(payload): ValidatedJson<CreateProjectRequest>,
) -> AppResult<(StatusCode, Json<ProjectResponse>)> {
    let draft = payload.into_draft()?;

    let created = state
        .projects
        .create(&auth_user.name, draft)
        .await
        .map_err(AppError::from_repo("User"))?;

    Ok((StatusCode::CREATED, Json(ProjectResponse::from(created))))
}

#[utoipa::path(
    get,
    path = "/{user}/projects",
    params(("user" = String, Path, description = "User name")),
    responses(
        (status = 200, description = "Live projects ordered by number", body = [ProjectResponse]),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Projects"
)]
pub async fn list_projects(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<Vec<ProjectResponse>>> {
    let projects = state
        .projects
        .find_all(&auth_user.name)
        .await
        .map_err(AppError::from_repo("User"))?;

    Ok(Json(projects.into_iter().map(ProjectResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/{user}/projects/{project_id}",
    params(
        ("user" = String, Path, description = "User name"),
        ("project_id" = i32, Path, description = "Project number")
    ),
    responses(
        (status = 200, description = "Project details", body = ProjectResponse),
        (status = 400, description = "Project ID is invalid"),
        (status = 404, description = "Project not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Projects"
)]
pub async fn get_project(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path((_user, project_id)): Path<(String, String)>,
) -> AppResult<Json<ProjectResponse>> {
    let number = project_number(&project_id)?;

    let project = state
        .projects
        .find(&auth_user.name, number)
        .await
        .map_err(AppError::from_repo("Project"))?;

    Ok(Json(ProjectResponse::from(project)))
}

#[utoipa::path(
    patch,
    path = "/{user}/projects/{project_id}",
    params(
        ("user" = String, Path, description = "User name"),
        ("project_id" = i32, Path, description = "Project number")
    ),
    request_body = UpdateProjectRequest,
    responses(
        (status = 200, description = "Project updated", body = ProjectResponse),
        (status = 400, description = "Invalid request body, id or date"),
        (status = 404, description = "Project not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Projects"
)]
pub async fn update_project(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path((_user, project_id)): Path<(String, String)>,
    ValidatedJson(payload): ValidatedJson<UpdateProjectRequest>,
) -> AppResult<Json<ProjectResponse>> {
    let number = project_number(&project_id)?;
    let patch = payload.into_patch()?;

    let updated = state
        .projects
        .update(&auth_user.name, number, patch)
        .await
        .map_err(AppError::from_repo("Project"))?;

    Ok(Json(ProjectResponse::from(updated)))
}

#[utoipa::path(
    delete,
    path = "/{user}/projects/{project_id}",
    params(
        ("user" = String, Path, description = "User name"),
        ("project_id" = i32, Path, description = "Project number")
    ),
    responses(
        (status = 204, description = "Project and its tasks soft-deleted"),
        (status = 400, description = "Project ID is invalid"),
        (status = 404, description = "Project not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Projects"
)]
pub async fn delete_project(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path((_user, project_id)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    let number = project_number(&project_id)?;

    state
        .projects
        .soft_delete(&auth_user.name, number)
        .await
        .map_err(AppError::from_repo("Project"))?;

    tracing::info!(user = %auth_user.name, number, "Project deleted");
    Ok(StatusCode::NO_CONTENT)
}

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    Extension,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entities::user;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::{token_for, AuthUser};
use crate::repositories::{UserDraft, UserPatch};
use crate::state::AppState;
use crate::validation::ValidatedJson;

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 30))]
    #[schema(example = "alice")]
    pub name: String,
    #[validate(email, length(max = 255))]
    #[schema(example = "alice@example.com")]
    pub email: String,
    #[validate(length(min = 8, max = 64))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 30))]
    pub name: String,
    #[validate(email, length(max = 255))]
    pub email: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<user::Model> for UserResponse {
    fn from(user: user::Model) -> Self {
        UserResponse {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[utoipa::path(
    post,
    path = "/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid request body"),
        (status = 409, description = "Name or email already taken")
    ),
    tag = "Users"
)]
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SignupRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    tracing::debug!(name = %payload.name, "Signup request");

    let created = state
        .users
        .create(UserDraft {
            name: payload.name,
            email: payload.email,
            password: payload.password,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(created))))
}

#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credential issued", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Users"
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let user = state
        .users
        .authenticate(&payload.name, &payload.password)
        .await
        .inspect_err(|_| tracing::warn!(name = %payload.name, "Failed login"))?;

    tracing::info!(name = %user.name, "User logged in");
    Ok(Json(LoginResponse {
        token: token_for(&user.name),
    }))
}

#[utoipa::path(
    get,
    path = "/{user}",
    params(("user" = String, Path, description = "User name")),
    responses(
        (status = 200, description = "User profile", body = UserResponse),
        (status = 401, description = "Missing or malformed credential"),
        (status = 403, description = "Credential belongs to another user"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn get_user(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .users
        .find(&auth_user.name)
        .await
        .map_err(AppError::from_repo("User"))?;

    Ok(Json(UserResponse::from(user)))
}

#[utoipa::path(
    patch,
    path = "/{user}",
    params(("user" = String, Path, description = "User name")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Invalid request body"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Name or email already taken")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn update_user(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    let updated = state
        .users
        .update(
            &auth_user.name,
            UserPatch {
                name: payload.name,
                email: payload.email,
            },
        )
        .await
        .map_err(AppError::from_repo("User"))?;

    Ok(Json(UserResponse::from(updated)))
}

#[utoipa::path(
    delete,
    path = "/{user}",
    params(("user" = String, Path, description = "User name")),
    responses(
        (status = 204, description = "User and everything it owns soft-deleted"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<StatusCode> {
    state
        .users
        .soft_delete(&auth_user.name)
        .await
        .map_err(AppError::from_repo("User"))?;

    Ok(StatusCode::NO_CONTENT)
}

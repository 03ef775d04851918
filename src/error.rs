use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::json;
use validator::ValidationErrors;

use crate::entities::InvalidEnumValue;
use crate::repositories::RepoError;
use crate::validation::field_errors;

/// One failed rule on one request body field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("database error: {0}")]
    DatabaseError(#[from] sea_orm::DbErr),
    #[error("validation failed on {} field(s)", .0.len())]
    Validation(Vec<FieldError>),
    #[error("{0}")]
    InvalidId(String),
    #[error("invalid date")]
    InvalidDate,
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Conflict(String),
    #[error("internal error: {0}")]
    InternalServerError(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Maps a repository failure for `resource`; every `NotFound` reads the
    /// same whichever link of the ownership chain was missing.
    pub fn from_repo(resource: &'static str) -> impl FnOnce(RepoError) -> AppError {
        move |err| match err {
            RepoError::NotFound => AppError::NotFound(format!("{resource} not found")),
            other => AppError::from(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Validation(errors) => {
                return (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors }))).into_response();
            }
            AppError::DatabaseError(e) => {
                tracing::error!(error = %e, "Database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::InvalidId(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::InvalidDate => (
                StatusCode::BAD_REQUEST,
                "Date format is invalid (yyyy-MM-dd)".to_string(),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::InternalServerError(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("Resource not found".to_string()),
            RepoError::InvalidArgument(msg) => AppError::BadRequest(msg),
            RepoError::AlreadyExists => AppError::Conflict("User already exists".to_string()),
            RepoError::Unauthenticated => AppError::Unauthorized("Invalid credentials".to_string()),
            RepoError::PasswordHash(msg) => AppError::InternalServerError(msg),
            RepoError::Database(e) => AppError::DatabaseError(e),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(field_errors(&errors))
    }
}

impl From<InvalidEnumValue> for AppError {
    fn from(err: InvalidEnumValue) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

use std::collections::HashMap;

use axum::{
    extract::{Path, Request},
    http::{header, HeaderValue},
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub const BEARER_PREFIX: &str = "Bearer ";
pub const TOKEN_PREFIX: &str = "mock-token-for-";

/// Identity proven by the request's credential, attached as an extension.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialError {
    Missing,
    Malformed,
}

impl From<CredentialError> for AppError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::Missing => {
                AppError::Unauthorized("Authorization header required".to_string())
            }
            CredentialError::Malformed => AppError::Unauthorized("Invalid token format".to_string()),
        }
    }
}

/// Token handed out by login for `name`.
pub fn token_for(name: &str) -> String {
    format!("{TOKEN_PREFIX}{name}")
}

/// Extracts the identity from an `Authorization` header value.
pub fn parse_credential(value: Option<&HeaderValue>) -> Result<&str, CredentialError> {
    let value = value.ok_or(CredentialError::Missing)?;
    let raw = value.to_str().map_err(|_| CredentialError::Malformed)?;

    let identity = raw
        .strip_prefix(BEARER_PREFIX)
        .and_then(|token| token.strip_prefix(TOKEN_PREFIX))
        .ok_or(CredentialError::Malformed)?;

    if identity.is_empty() {
        return Err(CredentialError::Malformed);
    }
    Ok(identity)
}

pub async fn auth_middleware(
    Path(params): Path<HashMap<String, String>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let identity = parse_credential(req.headers().get(header::AUTHORIZATION))
        .inspect_err(|err| tracing::warn!(?err, path = %req.uri().path(), "Rejected credential"))?
        .to_string();

    let target = params.get("user").map(String::as_str).unwrap_or_default();
    if identity != target {
        tracing::warn!(%identity, %target, "Access to another user's resources denied");
        return Err(AppError::Forbidden(
            "You are not authorized to access this resource".to_string(),
        ));
    }

    req.extensions_mut().insert(AuthUser { name: identity });

    Ok(next.run(req).await)
}

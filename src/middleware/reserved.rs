use std::collections::HashMap;

use axum::{
    extract::{Path, Request},
    middleware::Next,
    response::Response,
};

use crate::error::AppError;

/// First path segments owned by fixed routes; never treated as a user name.
pub const RESERVED_SEGMENTS: [&str; 3] = ["login", "admin", "health"];

pub fn is_reserved(segment: &str) -> bool {
    RESERVED_SEGMENTS.contains(&segment)
}

/// Answers 404 for `/{user}` routes whose user segment is reserved, before
/// any credential is looked at.
pub async fn reserved_guard(
    Path(params): Path<HashMap<String, String>>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(segment) = params.get("user").filter(|s| is_reserved(s)) {
        tracing::warn!(%segment, path = %req.uri().path(), "Reserved segment routed as user");
        return Err(AppError::NotFound("Route not found".to_string()));
    }

    Ok(next.run(req).await)
}

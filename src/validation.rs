//! Request-boundary helpers: validated JSON bodies, path ids and wire dates.

use std::borrow::Cow;

use axum::{
    extract::{FromRequest, Request},
    Json,
};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::entities::project::ProjectStatus;
use crate::entities::task::{TaskPriority, TaskStatus};
use crate::entities::InvalidEnumValue;
use crate::error::{AppError, FieldError};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// JSON body that has passed its `validator` rules.
///
/// Unparsable bodies become a 400 with the decoder's message; rule failures a
/// 400 listing every failing field.
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// Parses an unsigned decimal path id; signs and whitespace are rejected.
pub fn parse_id(raw: &str, entity: &str) -> Result<i32, AppError> {
    let invalid = || AppError::InvalidId(format!("{entity} ID is invalid"));
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    raw.parse::<i32>().map_err(|_| invalid())
}

/// Parses a `YYYY-MM-DD` date. chrono alone accepts unpadded fields and a
/// leading sign, so the shape is checked first.
pub fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    if !is_calendar_shape(raw) {
        return Err(AppError::InvalidDate);
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| AppError::InvalidDate)
}

fn is_calendar_shape(raw: &str) -> bool {
    raw.len() == 10
        && raw.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        })
}

pub fn parse_optional_date(raw: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    raw.map(parse_date).transpose()
}

pub fn project_status(value: &str) -> Result<(), ValidationError> {
    value.parse::<ProjectStatus>().map(|_| ()).map_err(one_of)
}

pub fn task_status(value: &str) -> Result<(), ValidationError> {
    value.parse::<TaskStatus>().map(|_| ()).map_err(one_of)
}

pub fn task_priority(value: &str) -> Result<(), ValidationError> {
    value.parse::<TaskPriority>().map(|_| ()).map_err(one_of)
}

fn one_of(err: InvalidEnumValue) -> ValidationError {
    let mut error = ValidationError::new("one_of");
    error.message = Some(Cow::Owned(format!("must be one of {}", err.expected)));
    error
}

/// Flattens `validator` output into a field-sorted list.
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| FieldError {
                field: field.to_string(),
                message: describe(err),
            })
        })
        .collect();
    out.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.message.cmp(&b.message)));
    out
}

fn describe(err: &ValidationError) -> String {
    if let Some(message) = &err.message {
        return message.to_string();
    }

    let param = |name: &str| err.params.get(name).map(|v| v.to_string());

    match err.code.as_ref() {
        "length" => {
            if err.params.get("value").and_then(|v| v.as_str()) == Some("") {
                return "is required".to_string();
            }
            match (param("min"), param("max")) {
                (Some(min), Some(max)) => format!("must be between {min} and {max} characters"),
                (None, Some(max)) => format!("must be at most {max} characters"),
                (Some(min), None) => format!("must be at least {min} characters"),
                (None, None) => "has an invalid length".to_string(),
            }
        }
        "email" => "must be a valid email address".to_string(),
        "range" => match param("min") {
            Some(min) => format!("must be greater than or equal to {min}"),
            None => "is out of range".to_string(),
        },
        _ => "is invalid".to_string(),
    }
}

pub mod project;
pub mod task;
pub mod user;

/// A wire value that does not name any variant of a closed enum column.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {field} '{value}', expected one of {expected}")]
pub struct InvalidEnumValue {
    pub field: &'static str,
    pub value: String,
    pub expected: &'static str,
}

impl InvalidEnumValue {
    pub fn new(field: &'static str, value: &str, expected: &'static str) -> Self {
        Self {
            field,
            value: value.to_string(),
            expected,
        }
    }
}

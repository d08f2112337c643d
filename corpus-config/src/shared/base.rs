use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A field holds a value outside of its allowed range.
    #[error("Invalid value for field `{field}`: {constraint}")]
    InvalidFieldValue { field: String, constraint: String },
}

impl ValidationError {
    pub(crate) fn invalid_field(field: &str, constraint: &str) -> Self {
        Self::InvalidFieldValue {
            field: field.to_owned(),
            constraint: constraint.to_owned(),
        }
    }
}

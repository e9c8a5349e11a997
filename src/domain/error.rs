use thiserror::Error;

/// Errors raised by entities while enforcing their invariants.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("{0}")]
    InvalidState(String),
}

impl DomainError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        DomainError::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        DomainError::InvalidState(message.into())
    }
}

/// Rejects blank values and values longer than `max` characters once trimmed,
/// returning the trimmed value otherwise.
pub(crate) fn required_text(
    field: &'static str,
    label: &str,
    value: &str,
    max: usize,
) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(
            field,
            format!("{} cannot be empty", label),
        ));
    }
    if trimmed.chars().count() > max {
        return Err(DomainError::validation(
            field,
            format!("{} cannot exceed {} characters", label, max),
        ));
    }
    Ok(trimmed.to_string())
}

/// Trims an optional free-text value. The `max` limit applies to the value as
/// given, surrounding whitespace included.
pub(crate) fn optional_text(
    field: &'static str,
    label: &str,
    value: &str,
    max: Option<usize>,
) -> Result<String, DomainError> {
    if let Some(max) = max {
        if value.chars().count() > max {
            return Err(DomainError::validation(
                field,
                format!("{} cannot exceed {} characters", label, max),
            ));
        }
    }
    Ok(value.trim().to_string())
}

//! Field rules for project and task text.
//!
//! Checked inside the services after the existence and authorization
//! checks, so a bad field on a missing or forbidden resource still reports
//! the missing or forbidden resource.

use super::error::{ServiceError, ServiceResult};

pub const NAME_MAX_CHARS: usize = 200;
pub const CLIENT_MAX_CHARS: usize = 200;
pub const DESCRIPTION_MAX_CHARS: usize = 5000;

/// Fails when `value` is longer than `max` characters
pub(crate) fn bounded(field: &str, value: &str, max: usize) -> ServiceResult<()> {
    if value.chars().count() > max {
        return Err(ServiceError::Validation(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}

/// Trims `value` and fails when it is empty or longer than `max`
pub(crate) fn required(field: &str, value: &str, max: usize) -> ServiceResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ServiceError::Validation(format!("{} is required", field)));
    }
    bounded(field, value, max)?;
    Ok(value.to_string())
}

/// Applies [`bounded`] to an optional patch field
pub(crate) fn bounded_opt(field: &str, value: Option<&String>, max: usize) -> ServiceResult<()> {
    match value {
        Some(value) => bounded(field, value, max),
        None => Ok(()),
    }
}

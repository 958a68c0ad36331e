//! Service error taxonomy.
//!
//! Every operation fails with one of these kinds, checked in the order
//! existence, then authorization, then business rule.

use thiserror::Error;

use crate::auth::{authorization::AuthzError, jwt::JwtError, password::PasswordError};
use crate::store::StoreError;

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// A referenced entity does not exist
    #[error("{0}")]
    NotFound(String),

    /// The actor's role does not permit the action
    #[error("{0}")]
    Authorization(String),

    /// Credentials or a one-time token were rejected
    #[error("{0}")]
    Unauthenticated(String),

    /// Input breaks a domain rule
    #[error("{0}")]
    Validation(String),

    /// The action makes no sense in the current state
    #[error("{0}")]
    InvalidOperation(String),

    /// Persistence or infrastructure failure; the detail is for logs only
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn not_found(what: &str) -> Self {
        ServiceError::NotFound(format!("{} does not exist", what))
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ServiceError::NotFound("record does not exist".to_string()),
            StoreError::Conflict(rule) => ServiceError::InvalidOperation(format!("conflict on {}", rule)),
            StoreError::Persistence(msg) => ServiceError::Internal(msg),
        }
    }
}

impl From<AuthzError> for ServiceError {
    fn from(err: AuthzError) -> Self {
        ServiceError::Authorization(err.to_string())
    }
}

impl From<PasswordError> for ServiceError {
    fn from(err: PasswordError) -> Self {
        ServiceError::Internal(err.to_string())
    }
}

impl From<JwtError> for ServiceError {
    fn from(err: JwtError) -> Self {
        ServiceError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::authorization::Role;

    #[test]
    fn test_store_errors_map_to_kinds() {
        assert!(matches!(
            ServiceError::from(StoreError::NotFound),
            ServiceError::NotFound(_)
        ));
        assert!(matches!(
            ServiceError::from(StoreError::Conflict("users_email_key".into())),
            ServiceError::InvalidOperation(_)
        ));
        assert_eq!(
            ServiceError::from(StoreError::Persistence("disk full".into())),
            ServiceError::Internal("disk full".into())
        );
    }

    #[test]
    fn test_denial_message_is_kept() {
        let err = ServiceError::from(AuthzError::Denied {
            role: Role::None,
            action: "view this project".into(),
        });

        assert_eq!(err.to_string(), "Not allowed to view this project");
    }

    #[test]
    fn test_not_found_helper() {
        assert_eq!(
            ServiceError::not_found("project").to_string(),
            "project does not exist"
        );
    }
}

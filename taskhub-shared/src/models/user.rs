/// User model
///
/// This module provides the User record and the inputs used to create and
/// update it. Persistence lives behind [`crate::store::UserStore`].
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     email VARCHAR(255) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     confirmed BOOLEAN NOT NULL DEFAULT FALSE,
///     token_hash CHAR(64),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Lifecycle
///
/// ```text
/// register ──► unconfirmed (token set) ──confirm──► confirmed (token cleared)
///                                                     │
///                  forgot password ◄──────────────────┘
///                  (token set) ──new password──► token cleared, hash replaced
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User account
///
/// Passwords are stored as Argon2id hashes and one-time tokens as SHA-256
/// digests. Neither is ever serialized; use [`PublicUser`] for anything that
/// leaves the service layer.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Email address, unique across all users
    pub email: String,

    /// Argon2id password hash
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Whether the account has been confirmed through the emailed token
    pub confirmed: bool,

    /// SHA-256 digest of the pending confirmation or password-reset token
    #[serde(skip_serializing)]
    pub token_hash: Option<String>,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Returns the public projection of this user
    pub fn to_public(&self) -> PublicUser {
        PublicUser::from(self)
    }
}

/// User fields that are safe to return to any caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

/// Input for creating a new user
///
/// The account always starts unconfirmed.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Display name
    pub name: String,

    /// Email address
    pub email: String,

    /// Argon2id password hash (NOT the plaintext password)
    pub password_hash: String,

    /// Digest of the confirmation token sent by mail
    pub token_hash: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "$argon2id$v=19$secret".to_string(),
            confirmed: true,
            token_hash: Some("f".repeat(64)),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_serialization_skips_secrets() {
        let json = serde_json::to_value(sample_user()).unwrap();

        assert!(json.get("password_hash").is_none());
        assert!(json.get("token_hash").is_none());
        assert_eq!(json["email"], "ada@example.com");
    }

    #[test]
    fn test_public_user_projection() {
        let user = sample_user();
        let public = user.to_public();

        assert_eq!(public.id, user.id);
        assert_eq!(public.name, "Ada");

        let json = serde_json::to_value(&public).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        assert_eq!(keys.len(), 3);
        assert!(json.get("confirmed").is_none());
    }
}

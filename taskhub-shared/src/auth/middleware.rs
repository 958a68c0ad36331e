/// Request authentication
///
/// Resolves the `Authorization: Bearer <jwt>` header to an [`AuthContext`].
/// The token must verify and its subject must still exist in the store; a
/// token for a deleted user is rejected like a bad signature.
///
/// The API server runs [`authenticate`] in its auth layer and inserts the
/// context into request extensions, where handlers pick it up:
///
/// ```
/// use axum::Extension;
/// use taskhub_shared::auth::middleware::AuthContext;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("User: {}", auth.user_id)
/// }
/// ```

use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::jwt::{validate_token, JwtError};
use crate::store::Store;

/// Authenticated actor of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    pub user_id: Uuid,
}

/// Error type for request authentication
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No Authorization header
    #[error("Missing credentials")]
    MissingCredentials,

    /// Authorization header is not a Bearer token
    #[error("{0}")]
    InvalidFormat(String),

    /// Token failed verification or names an unknown user
    #[error("{0}")]
    InvalidToken(String),

    /// Store lookup failed
    #[error("Store error: {0}")]
    StoreError(String),
}

/// Extracts the bearer token from request headers
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))
}

/// Verifies the request's bearer token and resolves the user
pub async fn authenticate(
    store: &dyn Store,
    secret: &str,
    headers: &HeaderMap,
) -> Result<AuthContext, AuthError> {
    let token = bearer_token(headers)?;

    let claims = validate_token(token, secret).map_err(|e| match e {
        JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
        JwtError::InvalidIssuer => AuthError::InvalidToken("Invalid issuer".to_string()),
        _ => AuthError::InvalidToken("Invalid token".to_string()),
    })?;

    let user = store
        .find_user_by_id(claims.sub)
        .await
        .map_err(|e| AuthError::StoreError(e.to_string()))?
        .ok_or_else(|| {
            debug!(user_id = %claims.sub, "Token subject no longer exists");
            AuthError::InvalidToken("Invalid token".to_string())
        })?;

    Ok(AuthContext { user_id: user.id })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::issue_token;
    use crate::models::user::NewUser;
    use crate::store::{memory::InMemoryStore, UserStore};
    use axum::http::HeaderValue;
    use chrono::Duration;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(&headers("Bearer abc")), Ok("abc"));
        assert_eq!(
            bearer_token(&HeaderMap::new()),
            Err(AuthError::MissingCredentials)
        );
        assert!(matches!(
            bearer_token(&headers("Basic abc")),
            Err(AuthError::InvalidFormat(_))
        ));
        assert!(matches!(
            bearer_token(&headers("Bearer ")),
            Err(AuthError::InvalidFormat(_))
        ));
    }

    #[tokio::test]
    async fn test_authenticate_resolves_existing_user() {
        let store = InMemoryStore::new();
        let user = store
            .insert_user(NewUser {
                name: "Ana".to_string(),
                email: "ana@example.com".to_string(),
                password_hash: "hash".to_string(),
                token_hash: None,
            })
            .await
            .unwrap();

        let token = issue_token(user.id, SECRET, Duration::hours(1)).unwrap();
        let context = authenticate(&store, SECRET, &headers(&format!("Bearer {}", token)))
            .await
            .unwrap();

        assert_eq!(context.user_id, user.id);
    }

    #[tokio::test]
    async fn test_authenticate_rejects_unknown_subject() {
        let store = InMemoryStore::new();
        let token = issue_token(Uuid::new_v4(), SECRET, Duration::hours(1)).unwrap();

        let result = authenticate(&store, SECRET, &headers(&format!("Bearer {}", token))).await;
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }
}

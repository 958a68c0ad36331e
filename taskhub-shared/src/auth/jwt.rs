/// Session tokens (JWT)
///
/// A successful login returns an HS256-signed JWT whose subject is the user
/// ID. The API's authentication layer validates it on every protected request
/// and then resolves the user from the store.
///
/// # Claims
///
/// - `sub`: User ID
/// - `iss`: Always `"taskhub"`
/// - `iat` / `nbf`: Issue time
/// - `exp`: Expiration (default 30 days)
///
/// # Example
///
/// ```
/// use taskhub_shared::auth::jwt::{issue_token, validate_token, DEFAULT_EXPIRATION_DAYS};
/// use chrono::Duration;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = Uuid::new_v4();
/// let secret = "test-secret-key-at-least-32-bytes-long";
///
/// let token = issue_token(user_id, secret, Duration::days(DEFAULT_EXPIRATION_DAYS))?;
/// assert_eq!(validate_token(&token, secret)?.sub, user_id);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Token issuer
pub const ISSUER: &str = "taskhub";

/// Default session lifetime in days
pub const DEFAULT_EXPIRATION_DAYS: i64 = 30;

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Signature, format or claim check failed
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Token was issued by someone else
    #[error("Invalid issuer")]
    InvalidIssuer,
}

/// JWT claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - User ID
    pub sub: Uuid,

    /// Issuer
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,
}

impl Claims {
    /// Claims for `user_id` expiring after `expires_in`
    pub fn new(user_id: Uuid, expires_in: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + expires_in).timestamp(),
            nbf: now.timestamp(),
        }
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Signs claims with HS256
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Issues a session token for `user_id`
pub fn issue_token(user_id: Uuid, secret: &str, expires_in: Duration) -> Result<String, JwtError> {
    create_token(&Claims::new(user_id, expires_in), secret)
}

/// Validates signature, expiration, not-before and issuer
///
/// # Errors
///
/// - `JwtError::Expired` for an expired token
/// - `JwtError::InvalidIssuer` for a token from another issuer
/// - `JwtError::ValidationError` for anything else
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;
    validation.leeway = 0;

    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
            jsonwebtoken::errors::ErrorKind::InvalidIssuer => JwtError::InvalidIssuer,
            _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_claims_creation() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, Duration::days(DEFAULT_EXPIRATION_DAYS));

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.iss, "taskhub");
        assert_eq!(claims.exp - claims.iat, 30 * 24 * 3600);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_issue_and_validate() {
        let user_id = Uuid::new_v4();
        let token = issue_token(user_id, SECRET, Duration::hours(1)).unwrap();

        let claims = validate_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, user_id);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = issue_token(Uuid::new_v4(), SECRET, Duration::hours(1)).unwrap();

        assert!(matches!(
            validate_token(&token, "another-secret-key-at-least-32-bytes"),
            Err(JwtError::ValidationError(_))
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        let claims = Claims::new(Uuid::new_v4(), Duration::seconds(-3600));
        assert!(claims.is_expired());

        let token = create_token(&claims, SECRET).unwrap();
        assert!(matches!(validate_token(&token, SECRET), Err(JwtError::Expired)));
    }

    #[test]
    fn test_foreign_issuer_rejected() {
        let mut claims = Claims::new(Uuid::new_v4(), Duration::hours(1));
        claims.iss = "someone-else".to_string();

        let token = create_token(&claims, SECRET).unwrap();
        assert!(matches!(validate_token(&token, SECRET), Err(JwtError::InvalidIssuer)));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(validate_token("not.a.jwt", SECRET).is_err());
    }
}

/// Authentication and authorization
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and strength rules
/// - [`jwt`]: session token issue and validation
/// - [`token`]: one-time confirmation / reset tokens
/// - [`middleware`]: request authentication context
/// - [`authorization`]: role-based project and task permissions
///
/// # Example
///
/// ```
/// use taskhub_shared::auth::password::{hash_password, verify_password};
/// use taskhub_shared::auth::jwt::{issue_token, validate_token};
/// use chrono::Duration;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("Str0ng!pass")?;
/// assert!(verify_password("Str0ng!pass", &hash)?);
///
/// let secret = "test-secret-key-at-least-32-bytes-long";
/// let user_id = Uuid::new_v4();
/// let token = issue_token(user_id, secret, Duration::hours(1))?;
/// assert_eq!(validate_token(&token, secret)?.sub, user_id);
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod token;

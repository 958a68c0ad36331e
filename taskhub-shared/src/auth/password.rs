/// Password hashing with Argon2id
///
/// Hashes are stored in PHC string format, so the parameters travel with the
/// hash and verification does not need them.
///
/// # Parameters
///
/// - Memory: 64 MB (65536 KB)
/// - Iterations: 3
/// - Parallelism: 4 lanes
/// - Output: 32 bytes
///
/// Hashing is CPU-bound; request handlers use [`hash_password_async`] and
/// [`verify_password_async`], which move the work onto Tokio's blocking pool.
///
/// # Example
///
/// ```
/// use taskhub_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("C0rrect-horse")?;
/// assert!(verify_password("C0rrect-horse", &hash)?);
/// assert!(!verify_password("wrong", &hash)?);
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, ParamsBuilder, Version,
};

/// Minimum accepted password length
pub const MIN_PASSWORD_LENGTH: usize = 8;

const M_COST_KIB: u32 = 65536;
const T_COST: u32 = 3;
const P_COST: u32 = 4;
const OUTPUT_LEN: usize = 32;

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password
    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    /// Stored hash is not a valid PHC string
    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),

    /// The blocking hashing task did not complete
    #[error("Password task failed: {0}")]
    TaskFailed(String),
}

fn params() -> Result<Params, PasswordError> {
    ParamsBuilder::new()
        .m_cost(M_COST_KIB)
        .t_cost(T_COST)
        .p_cost(P_COST)
        .output_len(OUTPUT_LEN)
        .build()
        .map_err(|e| PasswordError::HashError(format!("Invalid parameters: {}", e)))
}

/// Hashes a password with Argon2id and a fresh random salt
///
/// # Errors
///
/// Returns `PasswordError::HashError` if hashing fails
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params()?);

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::HashError(format!("Hash generation failed: {}", e)))
}

/// Verifies a password against a stored PHC hash
///
/// Returns `Ok(false)` for a wrong password and an error only when the stored
/// hash itself is unusable.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| PasswordError::InvalidHash(format!("Failed to parse hash: {}", e)))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(format!("Verification failed: {}", e))),
    }
}

/// [`hash_password`] on the blocking thread pool
pub async fn hash_password_async(password: String) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| PasswordError::TaskFailed(e.to_string()))?
}

/// [`verify_password`] on the blocking thread pool
pub async fn verify_password_async(password: String, hash: String) -> Result<bool, PasswordError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| PasswordError::TaskFailed(e.to_string()))?
}

/// Checks a candidate password against the strength rules
///
/// Rules: at least [`MIN_PASSWORD_LENGTH`] characters, with an uppercase
/// letter, a lowercase letter, a digit and a symbol. The first failing rule is
/// reported.
///
/// ```
/// use taskhub_shared::auth::password::validate_password_strength;
///
/// assert!(validate_password_strength("MyP@ssw0rd!").is_ok());
/// assert!(validate_password_strength("Password123").is_err());
/// ```
pub fn validate_password_strength(password: &str) -> Result<(), String> {
    let rules: [(bool, &str); 5] = [
        (
            password.chars().count() >= MIN_PASSWORD_LENGTH,
            "Password must be at least 8 characters long",
        ),
        (
            password.chars().any(char::is_uppercase),
            "Password must contain at least one uppercase letter",
        ),
        (
            password.chars().any(char::is_lowercase),
            "Password must contain at least one lowercase letter",
        ),
        (
            password.chars().any(char::is_numeric),
            "Password must contain at least one digit",
        ),
        (
            password.chars().any(|c| !c.is_alphanumeric()),
            "Password must contain at least one special character",
        ),
    ];

    match rules.iter().find(|(ok, _)| !ok) {
        Some((_, message)) => Err(message.to_string()),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_embeds_parameters() {
        let hash = hash_password("Secr3t!pass").expect("Hash should succeed");

        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("v=19"));
        assert!(hash.contains("m=65536"));
        assert!(hash.contains("t=3"));
        assert!(hash.contains("p=4"));
    }

    #[test]
    fn test_same_password_different_hashes() {
        let first = hash_password("same").unwrap();
        let second = hash_password("same").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_verify() {
        let hash = hash_password("unicode-密码").unwrap();

        assert!(verify_password("unicode-密码", &hash).unwrap());
        assert!(!verify_password("unicode", &hash).unwrap());
        assert!(!verify_password("", &hash).unwrap());
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(matches!(
            verify_password("password", "not-a-phc-string"),
            Err(PasswordError::InvalidHash(_))
        ));
    }

    #[tokio::test]
    async fn test_async_wrappers() {
        let hash = hash_password_async("Async!Pass1".to_string()).await.unwrap();

        assert!(verify_password_async("Async!Pass1".to_string(), hash.clone())
            .await
            .unwrap());
        assert!(!verify_password_async("nope".to_string(), hash).await.unwrap());
    }

    #[test]
    fn test_strength_rules_in_order() {
        let cases = [
            ("Sh0rt!", "at least 8 characters"),
            ("lowercase1!", "uppercase letter"),
            ("UPPERCASE1!", "lowercase letter"),
            ("NoDigits!!", "digit"),
            ("NoSpecial123", "special character"),
        ];

        for (password, expected) in cases {
            let err = validate_password_strength(password).unwrap_err();
            assert!(err.contains(expected), "{} -> {}", password, err);
        }

        assert!(validate_password_strength("S3cur3$Password").is_ok());
    }
}

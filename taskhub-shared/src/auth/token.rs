/// One-time account tokens
///
/// Confirmation and password-reset links carry an opaque random token. Only
/// its SHA-256 digest is stored, so a leaked users table does not expose
/// usable links; lookups hash the presented token and match on the digest.
///
/// # Format
///
/// 32 characters from the base62 alphabet (`[A-Za-z0-9]`), roughly 190 bits
/// of entropy, safe to embed in a URL path segment.
///
/// ```
/// use taskhub_shared::auth::token::{generate_token, hash_token, is_well_formed};
///
/// let token = generate_token();
/// assert!(is_well_formed(&token));
/// assert_eq!(hash_token(&token).len(), 64);
/// ```

use rand::Rng;
use sha2::{Digest, Sha256};

/// Length of a generated token
pub const TOKEN_LENGTH: usize = 32;

const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Generates a new random token using the thread-local CSPRNG
pub fn generate_token() -> String {
    let mut rng = rand::thread_rng();

    (0..TOKEN_LENGTH)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}

/// Hex-encoded SHA-256 digest of a token
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Cheap shape check done before touching the store
pub fn is_well_formed(token: &str) -> bool {
    token.len() == TOKEN_LENGTH && token.bytes().all(|b| b.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_tokens_are_unique() {
        let tokens: std::collections::HashSet<String> = (0..100).map(|_| generate_token()).collect();
        assert_eq!(tokens.len(), 100);
    }

    #[test]
    fn test_hash_is_deterministic() {
        assert_eq!(hash_token("abc"), hash_token("abc"));
        assert_ne!(hash_token("abc"), hash_token("abd"));
        assert_eq!(
            hash_token("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_well_formed() {
        assert!(is_well_formed(&generate_token()));
        assert!(!is_well_formed("short"));
        assert!(!is_well_formed(&"-".repeat(TOKEN_LENGTH)));
        assert!(!is_well_formed(""));
    }
}

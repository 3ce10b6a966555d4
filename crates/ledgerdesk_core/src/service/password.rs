//! Password hashing for stored user credentials.
//!
//! # Invariants
//! - Stored values are bcrypt hashes (`$2b$<cost>$...`); plain text never
//!   reaches the repository.
//! - Verification never panics; anything that is not a valid bcrypt hash
//!   fails to verify.

use bcrypt::BcryptError;

/// Work factor for new hashes.
pub const HASH_COST: u32 = 10;

/// Hashes `password` with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, BcryptError> {
    bcrypt::hash(password, HASH_COST)
}

/// Checks `password` against a value produced by `hash_password`.
pub fn verify_password(stored: &str, password: &str) -> bool {
    bcrypt::verify(password, stored).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::{hash_password, verify_password, HASH_COST};

    #[test]
    fn hash_verifies_and_is_salted() {
        let first = hash_password("analytical").unwrap();
        let second = hash_password("analytical").unwrap();
        assert_ne!(first, second);
        assert!(first.starts_with(&format!("$2b${HASH_COST}$")));
        assert!(verify_password(&first, "analytical"));
        assert!(!verify_password(&first, "Analytical"));
    }

    #[test]
    fn malformed_hash_never_verifies() {
        assert!(!verify_password("plaintext", "plaintext"));
        assert!(!verify_password("sha256$salt$abc", "x"));
        assert!(!verify_password("", ""));
    }
}

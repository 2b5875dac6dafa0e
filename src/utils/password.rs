use bcrypt::{hash, verify, DEFAULT_COST};

use crate::utils::error::UserError;

/// Hashes a plaintext password with bcrypt (salted, adaptive cost).
pub fn hash_password(plain: &str) -> Result<String, UserError> {
    hash(plain, DEFAULT_COST).map_err(|e| UserError::Internal(format!("Failed to hash password: {}", e)))
}

/// Checks a plaintext password against a stored bcrypt hash.
/// bcrypt performs the digest comparison in constant time.
pub fn compare_password(plain: &str, hashed: &str) -> Result<bool, UserError> {
    verify(plain, hashed).map_err(|e| UserError::Internal(format!("Password verification error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_compare_roundtrip() {
        let hashed = hash_password("secret1").unwrap();
        assert_ne!(hashed, "secret1");
        assert!(compare_password("secret1", &hashed).unwrap());
        assert!(!compare_password("secret2", &hashed).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("secret1").unwrap();
        let b = hash_password("secret1").unwrap();
        assert_ne!(a, b);
    }
}

//! Password hashing with Argon2id
//!
//! Hashes are PHC strings, so the salt and parameters travel with the hash
//! and verification needs nothing but the stored string.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
        rand_core::OsRng,
    },
};

use crate::error::AuthError;

/// Default work factor (Argon2 time cost, in passes over memory)
pub const DEFAULT_HASH_COST: u32 = 2;

/// Hash a password with a fresh random salt
///
/// `cost` is the Argon2 time cost; memory and parallelism stay at the
/// library defaults.
pub fn hash_password(password: &str, cost: u32) -> Result<String, AuthError> {
    let params = Params::new(Params::DEFAULT_M_COST, cost, Params::DEFAULT_P_COST, None)
        .map_err(|e| AuthError::PasswordHash(format!("Invalid parameters: {}", e)))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::PasswordHash(e.to_string()))?;

    Ok(hash.to_string())
}

/// Verify a password against a stored hash
///
/// A mismatch is `Ok(false)`; only a malformed stored hash is an error.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AuthError::PasswordHash(format!("Invalid stored hash: {}", e)))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(PasswordHashError::Password) => Ok(false),
        Err(e) => Err(AuthError::PasswordHash(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("Abcdef1!", 1).unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert_ne!(hash, "Abcdef1!");
        assert!(verify_password("Abcdef1!", &hash).unwrap());
        assert!(!verify_password("Abcdef1?", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash_password("Abcdef1!", 1).unwrap();
        let second = hash_password("Abcdef1!", 1).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_cost_is_recorded_in_hash() {
        let hash = hash_password("Abcdef1!", 3).unwrap();
        assert!(hash.contains("t=3"));
        assert!(verify_password("Abcdef1!", &hash).unwrap());
    }

    #[test]
    fn test_zero_cost_rejected() {
        assert!(matches!(hash_password("Abcdef1!", 0), Err(AuthError::PasswordHash(_))));
    }

    #[test]
    fn test_malformed_hash() {
        let result = verify_password("Abcdef1!", "not-a-phc-string");
        assert!(matches!(result, Err(AuthError::PasswordHash(_))));
    }
}

//! Password hashing and verification.
//!
//! Records are encoded as `<derivedKeyHex>.<saltHex>`: a 64-byte scrypt
//! key derived with a fresh 16-byte random salt. Verification re-derives
//! from the stored salt and compares in constant time.

use rand::Rng;
use scrypt::{Params, scrypt};
use subtle::ConstantTimeEq;
use thiserror::Error;

const SALT_LENGTH: usize = 16;
const KEY_LENGTH: usize = 64;

// scrypt cost parameters: N = 2^14, r = 8, p = 1.
const SCRYPT_LOG_N: u8 = 14;
const SCRYPT_R: u32 = 8;
const SCRYPT_P: u32 = 1;

/// Errors that can occur while hashing a password.
///
/// These only arise from invalid KDF parameters, which are fixed at
/// compile time, so hitting one in practice indicates a bug.
#[derive(Debug, Error)]
pub enum PasswordHashError {
    /// The scrypt parameters were rejected.
    #[error("invalid key-derivation parameters")]
    InvalidParams,
    /// Key derivation failed.
    #[error("key derivation failed")]
    Derivation,
}

/// Hash a password with a fresh random salt.
///
/// # Errors
///
/// Returns `PasswordHashError` if key derivation fails.
pub fn hash_password(password: &str) -> Result<String, PasswordHashError> {
    let salt: [u8; SALT_LENGTH] = rand::rng().random();
    let key = derive_key(password.as_bytes(), &salt)?;
    Ok(format!("{}.{}", hex::encode(key), hex::encode(salt)))
}

/// Verify a supplied password against a stored hash record.
///
/// Returns `false` for malformed records (missing separator, empty or
/// non-hex parts) rather than erroring: a corrupt credential must read as
/// "wrong password", not take the server down. The final comparison is
/// constant-time and tolerates unequal-length keys.
#[must_use]
pub fn verify_password(supplied: &str, stored: &str) -> bool {
    let Some((key_hex, salt_hex)) = stored.split_once('.') else {
        return false;
    };
    if key_hex.is_empty() || salt_hex.is_empty() {
        return false;
    }

    let Ok(stored_key) = hex::decode(key_hex) else {
        return false;
    };
    let Ok(salt) = hex::decode(salt_hex) else {
        return false;
    };

    let Ok(candidate) = derive_key(supplied.as_bytes(), &salt) else {
        return false;
    };

    bool::from(candidate.as_slice().ct_eq(stored_key.as_slice()))
}

/// Derive a fixed-length key from a password and salt.
fn derive_key(password: &[u8], salt: &[u8]) -> Result<[u8; KEY_LENGTH], PasswordHashError> {
    let params = Params::new(SCRYPT_LOG_N, SCRYPT_R, SCRYPT_P, KEY_LENGTH)
        .map_err(|_| PasswordHashError::InvalidParams)?;

    let mut key = [0u8; KEY_LENGTH];
    scrypt(password, salt, &params, &mut key).map_err(|_| PasswordHashError::Derivation)?;
    Ok(key)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify_roundtrip() {
        let record = hash_password("correct horse battery staple").unwrap();
        assert!(verify_password("correct horse battery staple", &record));
        assert!(!verify_password("correct horse battery stapl", &record));
    }

    #[test]
    fn test_record_format() {
        let record = hash_password("secret123").unwrap();
        let (key_hex, salt_hex) = record.split_once('.').unwrap();
        assert_eq!(key_hex.len(), KEY_LENGTH * 2);
        assert_eq!(salt_hex.len(), SALT_LENGTH * 2);
        assert!(record.chars().all(|c| c.is_ascii_hexdigit() || c == '.'));
    }

    #[test]
    fn test_fresh_salt_per_hash() {
        let a = hash_password("same password").unwrap();
        let b = hash_password("same password").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("same password", &a));
        assert!(verify_password("same password", &b));
    }

    #[test]
    fn test_malformed_record_is_false_not_panic() {
        assert!(!verify_password("anything", "no-separator"));
        assert!(!verify_password("anything", ""));
        assert!(!verify_password("anything", "."));
        assert!(!verify_password("anything", "abcdef."));
        assert!(!verify_password("anything", ".abcdef"));
        assert!(!verify_password("anything", "not-hex.also-not-hex"));
    }

    #[test]
    fn test_truncated_key_fails_closed() {
        let record = hash_password("secret123").unwrap();
        let (key_hex, salt_hex) = record.split_once('.').unwrap();
        // Shorter stored key than the derived one must compare unequal,
        // not panic on the length mismatch.
        let truncated = format!("{}.{}", &key_hex[..32], salt_hex);
        assert!(!verify_password("secret123", &truncated));
    }
}

/// Password Hashing and Verification
///
/// Passwords are hashed with HMAC-SHA512 keyed by the deployment secret.
/// There is no per-user salt: the secret key stands in for one. Two users with
/// the same password therefore share a digest; this is a known simplification
/// of the credential format and changing it means changing the stored format.

use hmac::{Hmac, Mac};
use sha2::Sha512;

use crate::error::AppError;

type HmacSha512 = Hmac<Sha512>;

fn keyed_mac(key: &[u8]) -> Result<HmacSha512, AppError> {
    HmacSha512::new_from_slice(key)
        .map_err(|e| AppError::Internal(format!("Password hasher key rejected: {}", e)))
}

/// Hash a password with the deployment key
///
/// # Arguments
/// * `password` - Plain text password
/// * `key` - Deployment secret bytes
///
/// # Errors
/// Returns error if the HMAC cannot be keyed
pub fn hash_password(password: &str, key: &[u8]) -> Result<Vec<u8>, AppError> {
    let mut mac = keyed_mac(key)?;
    mac.update(password.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Verify a password against a stored digest
///
/// The comparison runs in constant time with respect to the digest contents.
pub fn verify_password(password: &str, digest: &[u8], key: &[u8]) -> bool {
    match keyed_mac(key) {
        Ok(mut mac) => {
            mac.update(password.as_bytes());
            mac.verify_slice(digest).is_ok()
        }
        Err(e) => {
            tracing::error!(error = %e, "Password verification unavailable");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &[u8] = b"a70c18675573a15b6e257c15616d134f94ec437988871489bacf2ac18775311f";

    #[test]
    fn test_hash_is_deterministic() {
        let first = hash_password("s3cret", KEY).expect("Failed to hash password");
        let second = hash_password("s3cret", KEY).expect("Failed to hash password");

        assert_eq!(first, second);
        // SHA-512 output size
        assert_eq!(first.len(), 64);
    }

    #[test]
    fn test_hash_depends_on_key() {
        let first = hash_password("s3cret", KEY).unwrap();
        let second = hash_password("s3cret", b"another-key").unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_verify_password() {
        let digest = hash_password("s3cret", KEY).unwrap();
        assert!(verify_password("s3cret", &digest, KEY));
    }

    #[test]
    fn test_verify_wrong_password() {
        let digest = hash_password("s3cret", KEY).unwrap();
        assert!(!verify_password("other", &digest, KEY));
    }

    #[test]
    fn test_verify_wrong_key() {
        let digest = hash_password("s3cret", KEY).unwrap();
        assert!(!verify_password("s3cret", &digest, b"another-key"));
    }

    #[test]
    fn test_verify_truncated_digest() {
        let digest = hash_password("s3cret", KEY).unwrap();
        assert!(!verify_password("s3cret", &digest[..32], KEY));
        assert!(!verify_password("s3cret", &[], KEY));
    }
}

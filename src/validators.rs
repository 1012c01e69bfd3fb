/// Input validators for credentials
/// Features:
/// 1. DoS Protection: Input length limits before any hashing happens
/// 2. Rejection of empty usernames and passwords

use crate::error::ValidationError;

const MAX_USERNAME_LENGTH: usize = 256;
const MAX_PASSWORD_LENGTH: usize = 1024; // bytes

/// Validates a username
/// - Must not be empty
/// - At most 256 characters
///
/// The username is the store key, so it is not trimmed or normalized.
pub fn is_valid_username(username: &str) -> Result<&str, ValidationError> {
    if username.is_empty() {
        return Err(ValidationError::EmptyField("username".to_string()));
    }

    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(ValidationError::TooLong(
            "username".to_string(),
            MAX_USERNAME_LENGTH,
        ));
    }

    Ok(username)
}

/// Validates a password
/// - Must not be empty
/// - At most 1024 bytes
pub fn is_valid_password(password: &str) -> Result<&str, ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::EmptyField("password".to_string()));
    }

    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(ValidationError::TooLong(
            "password".to_string(),
            MAX_PASSWORD_LENGTH,
        ));
    }

    Ok(password)
}

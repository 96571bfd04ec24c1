//! Input validation shared by the directory handlers

use crate::error::ApiError;

/// Minimum allowed password length
const MIN_PASSWORD_LENGTH: usize = 8;
/// Special characters a password must draw at least one of
const PASSWORD_SPECIALS: &str = "$*&@#!";
/// Maximum allowed email length
const MAX_EMAIL_LENGTH: usize = 254;

/// Check a password against the sign-up policy
///
/// At least 8 characters, only ASCII letters, digits and `$*&@#!`, with at
/// least one digit, one lowercase, one uppercase and one special character.
pub fn validate_password(password: &str) -> Result<(), ApiError> {
    let allowed = |c: char| c.is_ascii_alphanumeric() || PASSWORD_SPECIALS.contains(c);

    let meets_policy = password.chars().count() >= MIN_PASSWORD_LENGTH
        && password.chars().all(allowed)
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| PASSWORD_SPECIALS.contains(c));

    if !meets_policy {
        return Err(ApiError::BadRequest(
            "Password does not meet the minimum security requirements".to_string(),
        ));
    }
    Ok(())
}

/// Validate email shape and length
pub fn validate_email(email: &str) -> Result<(), ApiError> {
    if email.is_empty() || email.len() > MAX_EMAIL_LENGTH {
        return Err(ApiError::BadRequest("Invalid email".to_string()));
    }

    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if !valid {
        return Err(ApiError::BadRequest("Invalid email".to_string()));
    }
    Ok(())
}

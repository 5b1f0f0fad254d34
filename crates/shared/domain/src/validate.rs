//! Pure validation rules for the user value objects.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::{
    EMAIL_PATTERN, MAX_NAME_LENGTH, MAX_PASSWORD_LENGTH, MIN_NAME_LENGTH, MIN_PASSWORD_LENGTH,
};
use crate::error::{DomainError, DomainResult};
use crate::values::{Email, Name, Password};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(EMAIL_PATTERN).expect("email pattern is a valid regex"));

/// Fails with `InvalidEmail` when empty or not `local-part@domain.tld`.
pub fn validate_email(email: &Email) -> DomainResult<()> {
    if email.is_empty() || !EMAIL_RE.is_match(email.as_str()) {
        return Err(DomainError::InvalidEmail);
    }
    Ok(())
}

/// Fails with `InvalidName` when empty or outside 3..=255 characters.
pub fn validate_name(name: &Name) -> DomainResult<()> {
    let len = name.as_str().chars().count();
    if !(MIN_NAME_LENGTH..=MAX_NAME_LENGTH).contains(&len) {
        return Err(DomainError::InvalidName);
    }
    Ok(())
}

/// Fails with `InvalidPassword` when empty or outside 8..=255 characters.
pub fn validate_password(password: &Password) -> DomainResult<()> {
    let len = password.char_len();
    if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&len) {
        return Err(DomainError::InvalidPassword);
    }
    Ok(())
}

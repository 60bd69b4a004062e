use lazy_static::lazy_static;
use regex::Regex;

use crate::error::FormError;

/// Characters that satisfy the "special character" rule.
pub const SPECIAL_CHARACTERS: &str = "!@#$%^&*";

pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Human-readable summary of the password rules, shown on the registration page.
pub const PASSWORD_RULES: &str =
    "Password must be at least 6 characters, include 1 uppercase, 1 number, and 1 special character.";

lazy_static! {
    /// Whole password drawn from the permitted alphabet, at least six characters long.
    static ref PASSWORD_ALPHABET_REGEX: Regex = Regex::new(r"^[A-Za-z0-9!@#$%^&*]{6,}$").unwrap();

    static ref UPPERCASE_REGEX: Regex = Regex::new(r"[A-Z]").unwrap();

    static ref DIGIT_REGEX: Regex = Regex::new(r"[0-9]").unwrap();

    static ref SPECIAL_REGEX: Regex = Regex::new(r"[!@#$%^&*]").unwrap();
}

/// validate_required
///
/// Rejects values that are empty after trimming, reporting `prompt`. Like every validator here
/// it is pure and total: the `Display` of the returned `FormError` is the message the form shows.
pub fn validate_required(value: &str, prompt: &'static str) -> Result<(), FormError> {
    if value.trim().is_empty() {
        return Err(FormError::MissingField(prompt));
    }
    Ok(())
}

/// An email only has to contain an `@`.
pub fn validate_email(email: &str) -> Result<(), FormError> {
    if !email.contains('@') {
        return Err(FormError::InvalidEmail);
    }
    Ok(())
}

/// Minimum length, checked on its own so the user gets the more specific message first.
pub fn validate_password_length(password: &str) -> Result<(), FormError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(FormError::PasswordTooShort);
    }
    Ok(())
}

/// Full complexity rule: length, one uppercase letter, one digit, one special character,
/// and nothing outside `A-Z a-z 0-9 !@#$%^&*`.
pub fn validate_password_complexity(password: &str) -> Result<(), FormError> {
    let complex = PASSWORD_ALPHABET_REGEX.is_match(password)
        && UPPERCASE_REGEX.is_match(password)
        && DIGIT_REGEX.is_match(password)
        && SPECIAL_REGEX.is_match(password);

    if !complex {
        return Err(FormError::PasswordComplexity);
    }
    Ok(())
}

pub fn validate_password_match(password: &str, confirmation: &str) -> Result<(), FormError> {
    if password != confirmation {
        return Err(FormError::PasswordMismatch);
    }
    Ok(())
}

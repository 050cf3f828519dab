//! Input validation utilities

use regex::Regex;
use std::sync::OnceLock;

use crate::error::FieldError;

/// Trim and lower-case an email so lookups and the uniqueness rule agree.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate display name
pub fn validate_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Name is required".to_string());
    }

    if name.chars().count() > 255 {
        return Err("Name must be at most 255 characters long".to_string());
    }

    Ok(())
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate password against the configured length floor
pub fn validate_password(password: &str, min_length: usize) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    let length = password.chars().count();
    if length < min_length {
        return Err(format!(
            "Password must be at least {} characters long",
            min_length
        ));
    }

    if length > 128 {
        return Err("Password must be at most 128 characters long".to_string());
    }

    Ok(())
}

/// Run every sign-up check and collect the failures.
///
/// `email` is expected to be normalised already.
pub fn validate_sign_up(
    name: &str,
    email: &str,
    password: &str,
    min_password_length: usize,
) -> Result<(), Vec<FieldError>> {
    let errors: Vec<FieldError> = [
        ("name", validate_name(name)),
        ("email", validate_email(email)),
        ("password", validate_password(password, min_password_length)),
    ]
    .into_iter()
    .filter_map(|(field, result)| result.err().map(|message| FieldError::new(field, message)))
    .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

//! Input validation functions
//!
//! This module provides validation utilities for account and farm input.
//! Each check returns `Err(message)` with the message shown to the user;
//! callers attach the field name (see [`crate::errors::ValidationErrors`]).

use rust_decimal::Decimal;
use validator::ValidateEmail;

pub const USERNAME_MAX_LENGTH: usize = 150;
pub const NAME_MAX_LENGTH: usize = 150;
pub const EMAIL_MAX_LENGTH: usize = 254;
pub const FARM_NAME_MAX_LENGTH: usize = 255;
pub const FARM_TYPE_MAX_LENGTH: usize = 100;
pub const LOCATION_MAX_LENGTH: usize = 255;
pub const PHONE_NUMBER_MAX_LENGTH: usize = 20;

/// NUMERIC(10, 2)
pub const FARM_SIZE_MAX_DIGITS: u32 = 10;
pub const FARM_SIZE_DECIMAL_PLACES: u32 = 2;

pub const REQUIRED_MESSAGE: &str = "This field is required.";
pub const NULL_CHARACTER_MESSAGE: &str = "Null characters are not allowed.";

/// PostgreSQL text columns cannot store NUL
pub fn reject_null_characters(value: &str) -> Result<(), String> {
    if value.contains('\0') {
        return Err(NULL_CHARACTER_MESSAGE.to_string());
    }
    Ok(())
}

/// Trim a mandatory text field; blank counts as missing
pub fn require_text(value: Option<&str>) -> Result<&str, String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => {
            reject_null_characters(v)?;
            Ok(v)
        }
        _ => Err(REQUIRED_MESSAGE.to_string()),
    }
}

/// Mandatory password field: presence only, never trimmed
pub fn require_secret(value: Option<&str>) -> Result<&str, String> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(REQUIRED_MESSAGE.to_string()),
    }
}

/// Trim an optional text field, folding blank into `None`
pub fn normalize_optional(value: Option<String>) -> Result<Option<String>, String> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    if let Some(v) = &value {
        reject_null_characters(v)?;
    }
    Ok(value)
}

/// Enforce a column's character limit
pub fn validate_max_length(value: &str, max: usize) -> Result<(), String> {
    if value.chars().count() > max {
        return Err(format!(
            "Ensure this field has no more than {} characters.",
            max
        ));
    }
    Ok(())
}

/// Validate username: letters, digits and @/./+/-/_ only
pub fn validate_username(username: &str) -> Result<(), String> {
    validate_max_length(username, USERNAME_MAX_LENGTH)?;
    let allowed = |c: char| c.is_alphanumeric() || matches!(c, '_' | '.' | '@' | '+' | '-');
    if username.is_empty() || !username.chars().all(allowed) {
        return Err(
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters."
                .to_string(),
        );
    }
    Ok(())
}

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), String> {
    validate_max_length(email, EMAIL_MAX_LENGTH)?;
    if !email.validate_email() {
        return Err("Enter a valid email address.".to_string());
    }
    Ok(())
}

/// Lower-case the domain part, keep the local part as typed
pub fn normalize_email(email: &str) -> String {
    match email.trim().rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
        None => email.trim().to_string(),
    }
}

/// Validate that a farm size fits NUMERIC(10, 2)
pub fn validate_farm_size(size: &Decimal) -> Result<(), String> {
    let normalized = size.normalize();
    if normalized.scale() > FARM_SIZE_DECIMAL_PLACES {
        return Err(format!(
            "Ensure that there are no more than {} decimal places.",
            FARM_SIZE_DECIMAL_PLACES
        ));
    }
    let max_whole_digits = FARM_SIZE_MAX_DIGITS - FARM_SIZE_DECIMAL_PLACES;
    let whole = normalized.trunc().abs();
    let whole_digits = if whole.is_zero() {
        0
    } else {
        whole.to_string().len() as u32
    };
    if whole_digits > max_whole_digits {
        return Err(format!(
            "Ensure that there are no more than {} digits before the decimal point.",
            max_whole_digits
        ));
    }
    Ok(())
}

// ============================================================================
// User-Friendly Field Labels
// ============================================================================

/// Map technical field names to user-friendly display labels
pub fn get_field_display_label(field_name: &str) -> &str {
    match field_name {
        "username" => "Username",
        "email" => "Email",
        "first_name" => "First Name",
        "last_name" => "Last Name",
        "password" => "Password",
        "password2" => "Password Confirmation",
        "farm_name" => "Farm Name",
        "farm_type" => "Farm Type",
        "farm_size" => "Farm Size",
        "location" => "Location",
        "phone_number" => "Phone Number",
        "refresh_token" => "Refresh Token",
        _ => field_name,
    }
}

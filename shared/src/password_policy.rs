//! Password strength policy
//!
//! Checks applied to a new password at registration:
//! - minimum and maximum length (in characters)
//! - not entirely numeric
//! - not a well-known common password (or a common base with digits appended)
//! - not containing the user's own username, email local part or names
//!
//! Every rule is evaluated so the caller can report all problems at once.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shortest user attribute that is checked against the password
const MIN_ATTRIBUTE_LENGTH: usize = 3;

/// Password policy configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub max_length: usize,
    pub check_common_passwords: bool,
    pub check_user_attributes: bool,
    pub disallow_all_numeric: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            max_length: 128,
            check_common_passwords: true,
            check_user_attributes: true,
            disallow_all_numeric: true,
        }
    }
}

/// The account details a password must not resemble
#[derive(Debug, Clone, Copy, Default)]
pub struct UserAttributes<'a> {
    pub username: Option<&'a str>,
    pub email: Option<&'a str>,
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
}

/// Password policy violations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PasswordError {
    #[error("This password is too short. It must contain at least {min} characters.")]
    TooShort { min: usize },

    #[error("This password is too long. It must contain at most {max} characters.")]
    TooLong { max: usize },

    #[error("This password is too common.")]
    TooCommon,

    #[error("This password is entirely numeric.")]
    AllNumeric,

    #[error("The password is too similar to the {attribute}.")]
    TooSimilar { attribute: &'static str },
}

impl PasswordPolicy {
    /// Policy with every rule disabled except a length of 1 (tests only)
    pub fn minimal() -> Self {
        Self {
            min_length: 1,
            max_length: 128,
            check_common_passwords: false,
            check_user_attributes: false,
            disallow_all_numeric: false,
        }
    }

    /// Validate a password without user context
    pub fn validate(&self, password: &str) -> Result<(), Vec<PasswordError>> {
        self.validate_with_context(password, &UserAttributes::default())
    }

    /// Validate a password, collecting every violated rule
    pub fn validate_with_context(
        &self,
        password: &str,
        user: &UserAttributes<'_>,
    ) -> Result<(), Vec<PasswordError>> {
        let mut errors = Vec::new();
        let length = password.chars().count();

        if length < self.min_length {
            errors.push(PasswordError::TooShort {
                min: self.min_length,
            });
        }
        if length > self.max_length {
            errors.push(PasswordError::TooLong {
                max: self.max_length,
            });
        }

        if self.check_user_attributes {
            if let Some(attribute) = similar_attribute(password, user) {
                errors.push(PasswordError::TooSimilar { attribute });
            }
        }

        if self.check_common_passwords && is_common_password(password) {
            errors.push(PasswordError::TooCommon);
        }

        if self.disallow_all_numeric
            && !password.is_empty()
            && password.chars().all(|c| c.is_ascii_digit())
        {
            errors.push(PasswordError::AllNumeric);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// First user attribute contained in the password, case-insensitively
fn similar_attribute(password: &str, user: &UserAttributes<'_>) -> Option<&'static str> {
    let lower = password.to_lowercase();
    let email_local = user.email.and_then(|e| e.split('@').next());
    let candidates = [
        ("username", user.username),
        ("email address", email_local),
        ("first name", user.first_name),
        ("last name", user.last_name),
    ];

    candidates.into_iter().find_map(|(label, value)| {
        let value = value?.trim().to_lowercase();
        (value.chars().count() >= MIN_ATTRIBUTE_LENGTH && lower.contains(&value)).then_some(label)
    })
}

/// Exact match against the list, or a listed base followed only by digits
fn is_common_password(password: &str) -> bool {
    let lower = password.to_lowercase();

    if COMMON_PASSWORDS.contains(&lower.as_str()) {
        return true;
    }

    COMMON_PASSWORDS.iter().any(|common| {
        common.len() >= 4
            && lower.len() > common.len()
            && lower.starts_with(common)
            && lower[common.len()..].chars().all(|c| c.is_ascii_digit())
    })
}

static COMMON_PASSWORDS: &[&str] = &[
    "123456", "password", "12345678", "qwerty", "123456789",
    "12345", "1234", "111111", "1234567", "dragon",
    "123123", "baseball", "abc123", "football", "monkey",
    "letmein", "shadow", "master", "666666", "qwertyuiop",
    "123321", "mustang", "1234567890", "michael", "654321",
    "superman", "1qaz2wsx", "7777777", "121212", "000000",
    "qazwsx", "123qwe", "killer", "trustno1", "jordan",
    "zxcvbnm", "asdfgh", "hunter", "sunshine", "iloveyou",
    "charlie", "freedom", "princess", "welcome", "login",
    "admin", "passw0rd", "password1", "qwerty123", "changeme",
    "secret", "guest", "default", "access", "starwars",
    // Domain specific
    "farmer", "farming", "harvest", "tractor", "agrifinance",
];

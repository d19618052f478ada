//! User service: registration, login and token refresh
//!
//! Password hashing and verification run on the blocking thread pool.
//! Registration writes the user and its farmer profile in one transaction.

use crate::auth::{JwtService, PasswordService, TokenSubject};
use crate::error::ApiError;
use crate::repositories::{
    NewFarmerProfile, NewUser, UserRecord, UserRepository, EMAIL_UNIQUE_CONSTRAINT,
    USERNAME_UNIQUE_CONSTRAINT,
};
use agrifinance_shared::validation::{
    normalize_email, normalize_optional, reject_null_characters, require_secret, require_text,
    validate_email, validate_max_length, validate_username, FARM_NAME_MAX_LENGTH,
    FARM_TYPE_MAX_LENGTH, LOCATION_MAX_LENGTH, NAME_MAX_LENGTH, PHONE_NUMBER_MAX_LENGTH,
    REQUIRED_MESSAGE,
};
use agrifinance_shared::{
    AuthTokens, LoginRequest, PasswordPolicy, RefreshTokenRequest, RegisterRequest,
    UserAttributes, UserResponse, ValidationErrors,
};
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

pub const PASSWORD_MISMATCH: &str = "Password fields didn't match.";
pub const DUPLICATE_USERNAME: &str = "A user with that username already exists.";
pub const DUPLICATE_EMAIL: &str = "A user with that email already exists.";

/// Registration input that passed every field-level rule
#[derive(Debug, Clone)]
pub struct ValidatedRegistration {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub profile: NewFarmerProfile,
}

impl From<UserRecord> for UserResponse {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}

/// User service for authentication operations
pub struct UserService;

impl UserService {
    /// Check a registration request without touching the database.
    ///
    /// Field rules are all evaluated first; the password confirmation is
    /// compared only once every field is individually valid.
    pub fn validate_registration(
        req: RegisterRequest,
        policy: &PasswordPolicy,
    ) -> Result<ValidatedRegistration, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let username = checked_text(&mut errors, "username", req.username.as_deref(), |v| {
            validate_username(v)
        });
        let email = checked_text(&mut errors, "email", req.email.as_deref(), |v| {
            validate_email(v)
        })
        .map(|v| normalize_email(&v));
        let first_name = checked_text(&mut errors, "first_name", req.first_name.as_deref(), |v| {
            validate_max_length(v, NAME_MAX_LENGTH)
        });
        let last_name = checked_text(&mut errors, "last_name", req.last_name.as_deref(), |v| {
            validate_max_length(v, NAME_MAX_LENGTH)
        });

        let password = match require_secret(req.password.as_deref()) {
            Ok(v) => Some(v.to_string()),
            Err(message) => {
                errors.add("password", message);
                None
            }
        };
        if let Err(message) = require_secret(req.password2.as_deref()) {
            errors.add("password2", message);
        }

        let profile = NewFarmerProfile {
            farm_name: checked_optional(&mut errors, "farm_name", req.farm_name, FARM_NAME_MAX_LENGTH),
            farm_type: checked_optional(&mut errors, "farm_type", req.farm_type, FARM_TYPE_MAX_LENGTH),
            location: checked_optional(&mut errors, "location", req.location, LOCATION_MAX_LENGTH),
            phone_number: checked_optional(
                &mut errors,
                "phone_number",
                req.phone_number,
                PHONE_NUMBER_MAX_LENGTH,
            ),
        };

        if let Some(password) = password.as_deref() {
            let attributes = UserAttributes {
                username: username.as_deref(),
                email: email.as_deref(),
                first_name: first_name.as_deref(),
                last_name: last_name.as_deref(),
            };
            if let Err(violations) = policy.validate_with_context(password, &attributes) {
                for violation in violations {
                    errors.add("password", violation.to_string());
                }
            }
        }

        let (Some(username), Some(email), Some(first_name), Some(last_name), Some(password)) =
            (username, email, first_name, last_name, password)
        else {
            return Err(errors);
        };
        errors.into_result()?;

        if req.password2.as_deref() != Some(password.as_str()) {
            return Err(ValidationErrors::single("password", PASSWORD_MISMATCH));
        }

        Ok(ValidatedRegistration {
            username,
            email,
            first_name,
            last_name,
            password,
            profile,
        })
    }

    /// Register a new user together with their farmer profile
    pub async fn register(
        pool: &PgPool,
        policy: &PasswordPolicy,
        req: RegisterRequest,
    ) -> Result<UserResponse, ApiError> {
        let input = Self::validate_registration(req, policy)?;

        let mut conflicts = ValidationErrors::new();
        if UserRepository::username_exists(pool, &input.username)
            .await
            .map_err(ApiError::Internal)?
        {
            conflicts.add("username", DUPLICATE_USERNAME);
        }
        if UserRepository::email_exists(pool, &input.email)
            .await
            .map_err(ApiError::Internal)?
        {
            conflicts.add("email", DUPLICATE_EMAIL);
        }
        conflicts.into_result()?;

        let password_hash = PasswordService::hash_async(input.password)
            .await
            .map_err(ApiError::Internal)?;

        let new_user = NewUser {
            username: input.username,
            email: input.email,
            first_name: input.first_name,
            last_name: input.last_name,
            password_hash,
        };

        // A concurrent registration can still win the race; the unique
        // constraints reject ours and the transaction rolls back.
        let (user, _profile) = UserRepository::create_with_profile(pool, &new_user, &input.profile)
            .await
            .map_err(map_unique_violation)?;

        info!(user_id = %user.id, username = %user.username, "User registered");

        Ok(user.into())
    }

    /// Login with username and password
    ///
    /// Unknown user, wrong password and inactive account all produce the
    /// same error.
    pub async fn login(
        pool: &PgPool,
        jwt_service: &JwtService,
        req: LoginRequest,
    ) -> Result<AuthTokens, ApiError> {
        let mut errors = ValidationErrors::new();
        let username = match req.username.as_deref().map(str::trim) {
            Some(v) if !v.is_empty() => Some(v.to_string()),
            _ => {
                errors.add("username", REQUIRED_MESSAGE);
                None
            }
        };
        let password = match require_secret(req.password.as_deref()) {
            Ok(v) => Some(v.to_string()),
            Err(message) => {
                errors.add("password", message);
                None
            }
        };
        let (Some(username), Some(password)) = (username, password) else {
            return Err(errors.into());
        };

        // No stored username contains NUL, and Postgres rejects it as a parameter
        let user = if reject_null_characters(&username).is_ok() {
            UserRepository::find_by_username(pool, &username)
                .await
                .map_err(ApiError::Internal)?
        } else {
            None
        };

        let Some(user) = user else {
            PasswordService::verify_dummy_async(password)
                .await
                .map_err(ApiError::Internal)?;
            warn!(username = ?username, "Login failed: unknown username");
            return Err(ApiError::invalid_credentials());
        };

        let valid = PasswordService::verify_async(password, user.password_hash.clone())
            .await
            .map_err(ApiError::Internal)?;

        if !valid {
            warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(ApiError::invalid_credentials());
        }
        if !user.is_active {
            warn!(user_id = %user.id, "Login failed: inactive account");
            return Err(ApiError::invalid_credentials());
        }

        info!(user_id = %user.id, "User logged in");
        Self::issue_tokens(jwt_service, &user)
    }

    /// Exchange a refresh token for a new pair, re-reading the identity claims
    pub async fn refresh_token(
        pool: &PgPool,
        jwt_service: &JwtService,
        req: RefreshTokenRequest,
    ) -> Result<AuthTokens, ApiError> {
        let refresh_token = require_secret(req.refresh_token.as_deref())
            .map_err(|message| ApiError::field("refresh_token", message))?;

        let claims = jwt_service
            .validate_refresh_token(refresh_token)
            .map_err(|e| ApiError::Unauthorized(format!("Invalid refresh token: {}", e)))?;

        let user_id = claims
            .user_id()
            .map_err(|_| ApiError::Unauthorized("Invalid user ID in token".to_string()))?;

        let user = UserRepository::find_by_id(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .filter(|user| user.is_active)
            .ok_or_else(|| ApiError::Unauthorized("User not found".to_string()))?;

        Self::issue_tokens(jwt_service, &user)
    }

    /// Read projection of the authenticated user
    pub async fn get_current_user(pool: &PgPool, user_id: Uuid) -> Result<UserResponse, ApiError> {
        let user = UserRepository::find_by_id(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        Ok(user.into())
    }

    fn issue_tokens(jwt_service: &JwtService, user: &UserRecord) -> Result<AuthTokens, ApiError> {
        let pair = jwt_service
            .generate_token_pair(TokenSubject {
                user_id: user.id,
                username: &user.username,
                email: &user.email,
            })
            .map_err(ApiError::Internal)?;

        Ok(AuthTokens {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: jwt_service.access_token_expiry_secs(),
        })
    }
}

/// Trim a mandatory field and run its format rule, recording any failure
fn checked_text(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&str>,
    rule: impl FnOnce(&str) -> Result<(), String>,
) -> Option<String> {
    let result = require_text(value).and_then(|v| rule(v).map(|_| v.to_string()));
    match result {
        Ok(v) => Some(v),
        Err(message) => {
            errors.add(field, message);
            None
        }
    }
}

/// Normalize an optional field and enforce its length limit
fn checked_optional(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<String>,
    max: usize,
) -> Option<String> {
    match normalize_optional(value) {
        Ok(value) => {
            let value = value?;
            errors.check(field, validate_max_length(&value, max));
            Some(value)
        }
        Err(message) => {
            errors.add(field, message);
            None
        }
    }
}

/// Translate a unique-constraint violation into the matching field error
fn map_unique_violation(err: anyhow::Error) -> ApiError {
    let constraint = err
        .downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .filter(|db| db.is_unique_violation())
        .and_then(|db| db.constraint().map(str::to_string));

    match constraint.as_deref() {
        Some(USERNAME_UNIQUE_CONSTRAINT) => ApiError::field("username", DUPLICATE_USERNAME),
        Some(EMAIL_UNIQUE_CONSTRAINT) => ApiError::field("email", DUPLICATE_EMAIL),
        _ => ApiError::Internal(err),
    }
}

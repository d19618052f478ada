//! JWT token generation and validation
//!
//! Access and refresh tokens are HS256-signed and carry the user's
//! identity (`username`, `email`) alongside the registered claims, so
//! clients can read who is logged in without another round trip.

use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

pub const ACCESS_TOKEN_TYPE: &str = "access";
pub const REFRESH_TOKEN_TYPE: &str = "refresh";

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Unique token ID
    pub jti: String,
    /// "access" or "refresh"
    pub token_type: String,
    pub username: String,
    pub email: String,
}

/// Identity embedded into every token
#[derive(Debug, Clone, Copy)]
pub struct TokenSubject<'a> {
    pub user_id: Uuid,
    pub username: &'a str,
    pub email: &'a str,
}

/// Signed access + refresh tokens issued together
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Pre-computed JWT keys for efficient token operations
#[derive(Clone)]
struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl JwtKeys {
    fn new(secret: &str) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        }
    }
}

/// JWT service for token operations
///
/// Keys are derived once and shared through `Arc`, so cloning the service
/// into request handlers is cheap.
#[derive(Clone)]
pub struct JwtService {
    keys: JwtKeys,
    access_token_expiry_secs: i64,
    refresh_token_expiry_secs: i64,
}

impl JwtService {
    /// Call once at startup and store in AppState; do not create per-request.
    pub fn new(secret: &str, access_token_expiry_secs: i64, refresh_token_expiry_secs: i64) -> Self {
        Self {
            keys: JwtKeys::new(secret),
            access_token_expiry_secs,
            refresh_token_expiry_secs,
        }
    }

    /// Issue an access/refresh pair for the same subject
    pub fn generate_token_pair(&self, subject: TokenSubject<'_>) -> Result<TokenPair> {
        Ok(TokenPair {
            access_token: self.generate_access_token(subject)?,
            refresh_token: self.generate_refresh_token(subject)?,
        })
    }

    #[inline]
    pub fn generate_access_token(&self, subject: TokenSubject<'_>) -> Result<String> {
        self.generate_token(subject, ACCESS_TOKEN_TYPE, self.access_token_expiry_secs)
    }

    #[inline]
    pub fn generate_refresh_token(&self, subject: TokenSubject<'_>) -> Result<String> {
        self.generate_token(subject, REFRESH_TOKEN_TYPE, self.refresh_token_expiry_secs)
    }

    fn generate_token(
        &self,
        subject: TokenSubject<'_>,
        token_type: &str,
        expiry_secs: i64,
    ) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(expiry_secs);

        let claims = Claims {
            sub: subject.user_id.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
            token_type: token_type.to_string(),
            username: subject.username.to_string(),
            email: subject.email.to_string(),
        };

        encode(&Header::default(), &claims, &self.keys.encoding)
            .map_err(|e| anyhow::anyhow!("Failed to generate {} token: {}", token_type, e))
    }

    /// Validate signature and expiry, returning the claims
    #[inline]
    pub fn validate_token(&self, token: &str) -> Result<Claims> {
        let token_data = decode::<Claims>(token, &self.keys.decoding, &Validation::default())
            .map_err(|e| anyhow::anyhow!("Invalid token: {}", e))?;

        Ok(token_data.claims)
    }

    #[inline]
    pub fn validate_access_token(&self, token: &str) -> Result<Claims> {
        let claims = self.validate_token(token)?;
        if claims.token_type != ACCESS_TOKEN_TYPE {
            return Err(anyhow::anyhow!("Not an access token"));
        }
        Ok(claims)
    }

    #[inline]
    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims> {
        let claims = self.validate_token(token)?;
        if claims.token_type != REFRESH_TOKEN_TYPE {
            return Err(anyhow::anyhow!("Not a refresh token"));
        }
        Ok(claims)
    }

    /// Access token lifetime, reported to clients as `expires_in`
    #[inline]
    pub fn access_token_expiry_secs(&self) -> i64 {
        self.access_token_expiry_secs
    }
}

impl Claims {
    /// Parse `sub` back into the user id
    pub fn user_id(&self) -> Result<Uuid> {
        Uuid::parse_str(&self.sub).map_err(|e| anyhow::anyhow!("Invalid user ID in token: {}", e))
    }
}

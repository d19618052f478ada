//! Application state management
//!
//! Shared, read-only state passed to every handler via Axum's state
//! extraction. Expensive resources (JWT keys, the DB pool) are created once.

use crate::auth::JwtService;
use crate::config::AppConfig;
use agrifinance_shared::PasswordPolicy;
use sqlx::PgPool;
use std::sync::Arc;

/// Shared application state
///
/// - `db`: PgPool is internally Arc'd, cloning is O(1)
/// - `config`: Wrapped in Arc, cloning is O(1)
/// - `jwt`: Pre-computed keys wrapped in Arc, cloning is O(1)
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Pre-initialized JWT service with cached keys
    pub jwt: JwtService,
    /// Password strength rules applied at registration
    pub password_policy: Arc<PasswordPolicy>,
}

impl AppState {
    /// Create a new application state. Call once at startup.
    pub fn new(db: PgPool, config: AppConfig) -> Self {
        let jwt = JwtService::new(
            &config.jwt.secret,
            config.jwt.access_token_expiry_secs,
            config.jwt.refresh_token_expiry_secs,
        );
        let password_policy = Arc::new(config.password_policy());

        Self {
            db,
            config: Arc::new(config),
            jwt,
            password_policy,
        }
    }

    #[inline]
    pub fn db(&self) -> &PgPool {
        &self.db
    }

    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[inline]
    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }

    #[inline]
    pub fn password_policy(&self) -> &PasswordPolicy {
        &self.password_policy
    }
}

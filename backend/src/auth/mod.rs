//! Authentication module
//!
//! Provides JWT-based authentication with argon2 password hashing.

mod jwt;
mod middleware;
mod password;

pub use jwt::{Claims, JwtService, TokenPair, TokenSubject, ACCESS_TOKEN_TYPE, REFRESH_TOKEN_TYPE};
pub use middleware::AuthUser;
pub use password::PasswordService;

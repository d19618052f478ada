//! Agrifinance Shared Library
//!
//! This crate contains the wire types, field validation helpers and the
//! password strength policy used by the backend and by API clients.

pub mod errors;
pub mod password_policy;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use password_policy::{PasswordError, PasswordPolicy, UserAttributes};
pub use types::*;

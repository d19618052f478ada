//! Database repositories
//!
//! Provides data access layer for database operations.

pub mod farmer_profile;
pub mod user;

pub use farmer_profile::{
    FarmerProfileRecord, FarmerProfileRepository, NewFarmerProfile, UpdateFarmerProfile,
};
pub use user::{
    NewUser, UserRecord, UserRepository, EMAIL_UNIQUE_CONSTRAINT, USERNAME_UNIQUE_CONSTRAINT,
};

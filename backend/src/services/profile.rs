//! Profile service - business logic for farmer profile management

use crate::error::ApiError;
use crate::repositories::{FarmerProfileRecord, FarmerProfileRepository, UpdateFarmerProfile};
use agrifinance_shared::validation::{
    normalize_optional, validate_farm_size, validate_max_length, FARM_NAME_MAX_LENGTH,
    FARM_TYPE_MAX_LENGTH, LOCATION_MAX_LENGTH, PHONE_NUMBER_MAX_LENGTH,
};
use agrifinance_shared::{FarmerProfileResponse, UpdateFarmerProfileRequest, ValidationErrors};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

impl From<FarmerProfileRecord> for FarmerProfileResponse {
    fn from(record: FarmerProfileRecord) -> Self {
        Self {
            farm_name: record.farm_name,
            farm_type: record.farm_type,
            farm_size: record.farm_size,
            location: record.location,
            phone_number: record.phone_number,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Profile service for farmer profile operations
pub struct ProfileService;

impl ProfileService {
    /// Get the caller's farmer profile
    pub async fn get_profile(db: &PgPool, user_id: Uuid) -> Result<FarmerProfileResponse, ApiError> {
        let profile = FarmerProfileRepository::find_by_user_id(db, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Farmer profile not found".to_string()))?;

        Ok(profile.into())
    }

    /// Validate and normalize a profile update.
    ///
    /// Blank text values count as omitted, so they keep the stored value.
    pub fn validate_profile_update(
        req: UpdateFarmerProfileRequest,
    ) -> Result<UpdateFarmerProfile, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let mut text = |field: &str, value: Option<String>, max: usize| {
            let value = match normalize_optional(value) {
                Ok(value) => value?,
                Err(message) => {
                    errors.add(field, message);
                    return None;
                }
            };
            errors.check(field, validate_max_length(&value, max));
            Some(value)
        };

        let updates = UpdateFarmerProfile {
            farm_name: text("farm_name", req.farm_name, FARM_NAME_MAX_LENGTH),
            farm_type: text("farm_type", req.farm_type, FARM_TYPE_MAX_LENGTH),
            location: text("location", req.location, LOCATION_MAX_LENGTH),
            phone_number: text("phone_number", req.phone_number, PHONE_NUMBER_MAX_LENGTH),
            farm_size: req.farm_size,
        };

        if let Some(size) = &updates.farm_size {
            errors.check("farm_size", validate_farm_size(size));
        }

        errors.into_result()?;
        Ok(updates)
    }

    /// Update the caller's farmer profile with validation
    pub async fn update_profile(
        db: &PgPool,
        user_id: Uuid,
        req: UpdateFarmerProfileRequest,
    ) -> Result<FarmerProfileResponse, ApiError> {
        let updates = Self::validate_profile_update(req)?;

        let profile = FarmerProfileRepository::update(db, user_id, updates)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Farmer profile not found".to_string()))?;

        info!(user_id = %user_id, "Farmer profile updated");

        Ok(profile.into())
    }
}

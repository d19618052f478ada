//! Farmer profile repository

use anyhow::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

/// Farmer profile record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FarmerProfileRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub farm_name: Option<String>,
    pub farm_type: Option<String>,
    pub farm_size: Option<Decimal>,
    pub location: Option<String>,
    pub phone_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Farm details captured at registration; `None` is stored as NULL
#[derive(Debug, Clone, Default)]
pub struct NewFarmerProfile {
    pub farm_name: Option<String>,
    pub farm_type: Option<String>,
    pub location: Option<String>,
    pub phone_number: Option<String>,
}

/// Partial update; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct UpdateFarmerProfile {
    pub farm_name: Option<String>,
    pub farm_type: Option<String>,
    pub farm_size: Option<Decimal>,
    pub location: Option<String>,
    pub phone_number: Option<String>,
}

const PROFILE_COLUMNS: &str = "id, user_id, farm_name, farm_type, farm_size, location, \
                               phone_number, created_at, updated_at";

pub struct FarmerProfileRepository;

impl FarmerProfileRepository {
    /// Insert the profile row on an open connection or transaction
    pub async fn insert(
        conn: &mut PgConnection,
        user_id: Uuid,
        profile: &NewFarmerProfile,
    ) -> Result<FarmerProfileRecord> {
        let record = sqlx::query_as::<_, FarmerProfileRecord>(&format!(
            r#"
            INSERT INTO farmer_profiles (user_id, farm_name, farm_type, location, phone_number)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(&profile.farm_name)
        .bind(&profile.farm_type)
        .bind(&profile.location)
        .bind(&profile.phone_number)
        .fetch_one(conn)
        .await?;

        Ok(record)
    }

    pub async fn find_by_user_id(
        pool: &PgPool,
        user_id: Uuid,
    ) -> Result<Option<FarmerProfileRecord>> {
        let record = sqlx::query_as::<_, FarmerProfileRecord>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM farmer_profiles WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Apply a partial update. `None` when the user has no profile row.
    pub async fn update(
        pool: &PgPool,
        user_id: Uuid,
        updates: UpdateFarmerProfile,
    ) -> Result<Option<FarmerProfileRecord>> {
        let record = sqlx::query_as::<_, FarmerProfileRecord>(&format!(
            r#"
            UPDATE farmer_profiles SET
                farm_name = COALESCE($2, farm_name),
                farm_type = COALESCE($3, farm_type),
                farm_size = COALESCE($4, farm_size),
                location = COALESCE($5, location),
                phone_number = COALESCE($6, phone_number),
                updated_at = NOW()
            WHERE user_id = $1
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(updates.farm_name)
        .bind(updates.farm_type)
        .bind(updates.farm_size)
        .bind(updates.location)
        .bind(updates.phone_number)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }
}

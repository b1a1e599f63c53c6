use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::profile::CreateProfileRequest;
use crate::error::{Result, StorageError};
use crate::models::Profile;

pub struct ProfileRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProfileRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, profile_id: Uuid) -> Result<Profile> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            SELECT profile_id, username, avatar_url, created_at, updated_at
            FROM profiles
            WHERE profile_id = $1
            "#,
        )
        .bind(profile_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(profile)
    }

    pub async fn create(&self, req: &CreateProfileRequest) -> Result<Profile> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (username, avatar_url)
            VALUES ($1, $2)
            RETURNING profile_id, username, avatar_url, created_at, updated_at
            "#,
        )
        .bind(&req.username)
        .bind(&req.avatar_url)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            let error = StorageError::from(e);
            if error.is_unique_violation() {
                StorageError::ConstraintViolation("Username already exists".to_string())
            } else {
                error
            }
        })?;

        Ok(profile)
    }
}

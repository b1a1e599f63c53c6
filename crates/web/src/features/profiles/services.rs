use sqlx::PgPool;
use storage::{
    dto::profile::CreateProfileRequest, error::Result, models::Profile,
    repository::profile::ProfileRepository,
};
use uuid::Uuid;

pub async fn create_profile(pool: &PgPool, request: &CreateProfileRequest) -> Result<Profile> {
    let repo = ProfileRepository::new(pool);
    repo.create(request).await
}

pub async fn get_profile(pool: &PgPool, profile_id: Uuid) -> Result<Profile> {
    let repo = ProfileRepository::new(pool);
    repo.find_by_id(profile_id).await
}

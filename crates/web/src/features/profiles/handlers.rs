use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{dto::profile::CreateProfileRequest, models::Profile};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebResult;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    post,
    path = "/api/profiles",
    request_body = CreateProfileRequest,
    responses(
        (status = 201, description = "Profile created successfully", body = Profile),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Username already exists")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "profiles"
)]
pub async fn create_profile(
    State(state): State<AppState>,
    Json(payload): Json<CreateProfileRequest>,
) -> WebResult<Response> {
    payload.validate()?;

    let profile = services::create_profile(state.db.pool(), &payload).await?;

    Ok((StatusCode::CREATED, Json(profile)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/profiles/{profile_id}",
    params(
        ("profile_id" = Uuid, Path, description = "Profile ID")
    ),
    responses(
        (status = 200, description = "Profile found", body = Profile),
        (status = 404, description = "Profile not found")
    ),
    tag = "profiles"
)]
pub async fn get_profile(
    State(state): State<AppState>,
    Path(profile_id): Path<Uuid>,
) -> WebResult<Response> {
    let profile = services::get_profile(state.db.pool(), profile_id).await?;

    Ok(Json(profile).into_response())
}

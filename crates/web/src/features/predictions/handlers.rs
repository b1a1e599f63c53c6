use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    dto::prediction::{CreatePredictionRequest, UserPredictionsResponse},
    models::Prediction,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebResult;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    post,
    path = "/api/predictions",
    request_body = CreatePredictionRequest,
    responses(
        (status = 201, description = "Prediction recorded", body = Prediction),
        (status = 400, description = "Invalid prediction"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Submissions are closed for this program"),
        (status = 404, description = "Program or user not found"),
        (status = 409, description = "A prediction already exists for this program")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "predictions"
)]
pub async fn submit_prediction(
    State(state): State<AppState>,
    Json(payload): Json<CreatePredictionRequest>,
) -> WebResult<Response> {
    payload.validate()?;

    let prediction =
        services::submit_prediction(state.db.pool(), &state.rules, &payload, state.now_local())
            .await?;
    tracing::info!(
        user_id = %prediction.user_id,
        program_id = %prediction.program_id,
        "Prediction submitted"
    );

    Ok((StatusCode::CREATED, Json(prediction)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/users/{user_id}/predictions",
    params(
        ("user_id" = Uuid, Path, description = "User profile ID")
    ),
    responses(
        (status = 200, description = "Scored predictions of the user", body = UserPredictionsResponse),
        (status = 404, description = "User not found")
    ),
    tag = "predictions"
)]
pub async fn get_user_predictions(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> WebResult<Response> {
    let response = services::get_user_predictions(state.db.pool(), user_id).await?;

    Ok(Json(response).into_response())
}

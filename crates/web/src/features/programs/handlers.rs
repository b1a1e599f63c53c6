use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    dto::program::{
        CreateProgramRequest, ProgramFilter, ProgramResultsRequest, RescoreResponse,
        UpdateProgramRequest,
    },
    models::Program,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::{WebError, WebResult};
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/api/programs",
    params(ProgramFilter),
    responses(
        (status = 200, description = "Programs in display order", body = Vec<Program>)
    ),
    tag = "programs"
)]
pub async fn list_programs(
    State(state): State<AppState>,
    Query(filter): Query<ProgramFilter>,
) -> WebResult<Json<Vec<Program>>> {
    let programs = services::list_programs(state.db.pool(), &filter, state.today()).await?;

    Ok(Json(programs))
}

#[utoipa::path(
    get,
    path = "/api/programs/{program_id}",
    params(
        ("program_id" = Uuid, Path, description = "Program ID")
    ),
    responses(
        (status = 200, description = "Program found", body = Program),
        (status = 404, description = "Program not found")
    ),
    tag = "programs"
)]
pub async fn get_program(
    State(state): State<AppState>,
    Path(program_id): Path<Uuid>,
) -> WebResult<Response> {
    let program = services::get_program(state.db.pool(), program_id).await?;

    Ok(Json(program).into_response())
}

#[utoipa::path(
    post,
    path = "/api/programs",
    request_body = CreateProgramRequest,
    responses(
        (status = 201, description = "Program created successfully", body = Program),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "programs"
)]
pub async fn create_program(
    State(state): State<AppState>,
    Json(payload): Json<CreateProgramRequest>,
) -> WebResult<Response> {
    payload.validate()?;
    payload
        .validate_modes()
        .map_err(|e| WebError::BadRequest(e.to_string()))?;

    let program = services::create_program(state.db.pool(), &payload).await?;
    tracing::info!(program_id = %program.program_id, "Program created");

    Ok((StatusCode::CREATED, Json(program)).into_response())
}

#[utoipa::path(
    put,
    path = "/api/programs/{program_id}",
    params(
        ("program_id" = Uuid, Path, description = "Program ID")
    ),
    request_body = UpdateProgramRequest,
    responses(
        (status = 200, description = "Program updated successfully", body = Program),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Program not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "programs"
)]
pub async fn update_program(
    State(state): State<AppState>,
    Path(program_id): Path<Uuid>,
    Json(payload): Json<UpdateProgramRequest>,
) -> WebResult<Response> {
    payload.validate()?;

    let program = services::update_program(state.db.pool(), program_id, &payload).await?;

    Ok(Json(program).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/programs/{program_id}",
    params(
        ("program_id" = Uuid, Path, description = "Program ID")
    ),
    responses(
        (status = 204, description = "Program deleted successfully"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Program not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "programs"
)]
pub async fn delete_program(
    State(state): State<AppState>,
    Path(program_id): Path<Uuid>,
) -> WebResult<StatusCode> {
    services::delete_program(state.db.pool(), program_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/api/programs/{program_id}/results",
    params(
        ("program_id" = Uuid, Path, description = "Program ID")
    ),
    request_body = ProgramResultsRequest,
    responses(
        (status = 200, description = "Results recorded and predictions rescored", body = Program),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Program not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "programs"
)]
pub async fn set_program_results(
    State(state): State<AppState>,
    Path(program_id): Path<Uuid>,
    Json(payload): Json<ProgramResultsRequest>,
) -> WebResult<Response> {
    payload.validate()?;
    payload
        .validate_scores()
        .map_err(|e| WebError::BadRequest(e.to_string()))?;

    let (program, rescored) =
        services::set_program_results(state.db.pool(), program_id, &payload).await?;
    tracing::info!(
        program_id = %program.program_id,
        rescored,
        "Program results recorded"
    );

    Ok(Json(program).into_response())
}

#[utoipa::path(
    post,
    path = "/api/admin/scores/recompute-all",
    responses(
        (status = 200, description = "Scores recomputed successfully", body = RescoreResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Recomputation failed")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "programs"
)]
pub async fn recompute_all_scores(State(state): State<AppState>) -> WebResult<Response> {
    let rescored_predictions = services::rescore_all(state.db.pool()).await?;
    tracing::info!("Recomputed scores for {} predictions", rescored_predictions);

    Ok(Json(RescoreResponse {
        rescored_predictions,
    })
    .into_response())
}

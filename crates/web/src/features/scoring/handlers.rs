use axum::Json;
use storage::{
    dto::prediction::ScorePreviewRequest,
    services::scoring::{ScoreBreakdown, score_prediction},
};

#[utoipa::path(
    post,
    path = "/api/scoring/preview",
    request_body = ScorePreviewRequest,
    responses(
        (status = 200, description = "Score the given prediction would receive", body = ScoreBreakdown)
    ),
    tag = "scoring"
)]
pub async fn preview_score(Json(payload): Json<ScorePreviewRequest>) -> Json<ScoreBreakdown> {
    Json(score_prediction(&payload.scoring_input()))
}

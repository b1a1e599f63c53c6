use chrono::NaiveDateTime;
use sqlx::PgPool;
use storage::{
    dto::prediction::{CreatePredictionRequest, ScoredPredictionResponse, UserPredictionsResponse},
    error::Result,
    models::Prediction,
    repository::{
        prediction::PredictionRepository, profile::ProfileRepository,
        program::ProgramRepository, store::RecordFilter,
    },
    services::{leaderboard::summarize, submission::SubmissionRules},
};
use uuid::Uuid;

/// Validate a prediction against its program and store it
pub async fn submit_prediction(
    pool: &PgPool,
    rules: &SubmissionRules,
    request: &CreatePredictionRequest,
    now_local: NaiveDateTime,
) -> Result<Prediction> {
    let program = ProgramRepository::new(pool)
        .find_by_id(request.program_id)
        .await?;
    let prediction = rules.prepare(&program, request, now_local)?;

    PredictionRepository::new(pool).create(&prediction).await
}

/// Every prediction of a user, scored, most recent program first
pub async fn get_user_predictions(pool: &PgPool, user_id: Uuid) -> Result<UserPredictionsResponse> {
    ProfileRepository::new(pool).find_by_id(user_id).await?;

    let records = PredictionRepository::new(pool)
        .fetch_records(&RecordFilter::for_user(user_id))
        .await?;
    let predictions: Vec<ScoredPredictionResponse> =
        records.into_iter().map(ScoredPredictionResponse::from).collect();
    let summary = summarize(predictions.iter().map(|p| &p.score));

    Ok(UserPredictionsResponse {
        user_id,
        summary,
        predictions,
    })
}

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// One user's forecast for one program.
///
/// The `calculated_*` and `total_score` columns are a cache written when the
/// program results are set. They are never authoritative: reads rescore from
/// the program and prediction fields.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Prediction {
    pub prediction_id: Uuid,
    pub user_id: Uuid,
    pub program_id: Uuid,
    pub predicted_audience: Decimal,
    pub predicted_score_team1: Option<i32>,
    pub predicted_score_team2: Option<i32>,
    pub predicted_bonus_answer: Option<String>,
    pub submitted_at: NaiveDateTime,
    pub calculated_accuracy: Option<Decimal>,
    pub calculated_score: Option<i32>,
    pub total_score: Option<i32>,
}

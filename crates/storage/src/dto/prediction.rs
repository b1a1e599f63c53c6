use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::ScoringRecord;
use crate::services::leaderboard::ScoreSummary;
use crate::services::scoring::{ScoreBreakdown, ScoringInput, score_prediction};

/// Request payload for submitting a prediction
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreatePredictionRequest {
    pub user_id: Uuid,

    pub program_id: Uuid,

    /// Forecast audience in millions of viewers.
    pub predicted_audience: Decimal,

    #[validate(range(min = 0, message = "Scores cannot be negative"))]
    pub predicted_score_team1: Option<i32>,

    #[validate(range(min = 0, message = "Scores cannot be negative"))]
    pub predicted_score_team2: Option<i32>,

    #[validate(length(max = 255))]
    pub predicted_bonus_answer: Option<String>,
}

/// A prediction that passed the submission rules, ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPrediction {
    pub user_id: Uuid,
    pub program_id: Uuid,
    pub predicted_audience: Decimal,
    pub predicted_score_team1: Option<i32>,
    pub predicted_score_team2: Option<i32>,
    pub predicted_bonus_answer: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ScoredPredictionResponse {
    pub prediction_id: Uuid,
    pub program_id: Uuid,
    pub program_name: String,
    pub channel: String,
    pub genre: String,
    pub air_date: NaiveDateTime,
    pub submitted_at: NaiveDateTime,
    pub predicted_audience: Decimal,
    pub real_audience: Option<Decimal>,
    pub predicted_score_team1: Option<i32>,
    pub predicted_score_team2: Option<i32>,
    pub real_score_team1: Option<i32>,
    pub real_score_team2: Option<i32>,
    pub predicted_bonus_answer: Option<String>,
    #[serde(flatten)]
    pub score: ScoreBreakdown,
}

impl From<ScoringRecord> for ScoredPredictionResponse {
    fn from(record: ScoringRecord) -> Self {
        let score = score_prediction(&record.scoring_input());
        Self {
            prediction_id: record.prediction_id,
            program_id: record.program_id,
            program_name: record.program_name,
            channel: record.channel,
            genre: record.genre,
            air_date: record.air_date,
            submitted_at: record.submitted_at,
            predicted_audience: record.predicted_audience,
            real_audience: record.real_audience,
            predicted_score_team1: record.predicted_score_team1,
            predicted_score_team2: record.predicted_score_team2,
            real_score_team1: record.real_score_team1,
            real_score_team2: record.real_score_team2,
            predicted_bonus_answer: record.predicted_bonus_answer,
            score,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserPredictionsResponse {
    pub user_id: Uuid,
    pub summary: ScoreSummary,
    pub predictions: Vec<ScoredPredictionResponse>,
}

/// Free-form scoring request, for checking the rules without storing anything
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ScorePreviewRequest {
    pub predicted_audience: Option<Decimal>,
    pub real_audience: Option<Decimal>,
    #[serde(default)]
    pub allow_score_prediction: bool,
    pub predicted_score_team1: Option<i32>,
    pub predicted_score_team2: Option<i32>,
    pub real_score_team1: Option<i32>,
    pub real_score_team2: Option<i32>,
    #[serde(default)]
    pub is_event_program: bool,
    pub predicted_bonus_answer: Option<String>,
    pub bonus_answer: Option<String>,
}

impl ScorePreviewRequest {
    pub fn scoring_input(&self) -> ScoringInput<'_> {
        ScoringInput {
            predicted_audience: self.predicted_audience,
            real_audience: self.real_audience,
            allow_score_prediction: self.allow_score_prediction,
            predicted_scores: self.predicted_score_team1.zip(self.predicted_score_team2),
            real_scores: self.real_score_team1.zip(self.real_score_team2),
            is_event_program: self.is_event_program,
            predicted_bonus_answer: self.predicted_bonus_answer.as_deref(),
            bonus_answer: self.bonus_answer.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_from_json_with_missing_fields() {
        let request: ScorePreviewRequest = serde_json::from_str(
            r#"{"predicted_audience": "4.6", "real_audience": "5.0"}"#,
        )
        .unwrap();

        let breakdown = score_prediction(&request.scoring_input());

        assert_eq!(breakdown.calculated_score, 80);
        assert_eq!(breakdown.total_score, 80);
    }

    #[test]
    fn test_scored_response_from_pending_record() {
        let record = ScoringRecord::sample(4, "3.1", None);
        let response = ScoredPredictionResponse::from(record);
        assert_eq!(response.score.calculated_accuracy, None);
        assert_eq!(response.score.total_score, 0);
    }
}

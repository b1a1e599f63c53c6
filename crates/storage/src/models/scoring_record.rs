use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::services::scoring::ScoringInput;

/// A prediction joined with its program and its author's profile.
///
/// This is the flat record every scoring and leaderboard computation reads.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ScoringRecord {
    pub prediction_id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub avatar_url: Option<String>,
    pub program_id: Uuid,
    pub program_name: String,
    pub channel: String,
    pub genre: String,
    pub air_date: NaiveDateTime,
    pub submitted_at: NaiveDateTime,

    pub predicted_audience: Decimal,
    pub real_audience: Option<Decimal>,

    pub allow_score_prediction: bool,
    pub predicted_score_team1: Option<i32>,
    pub predicted_score_team2: Option<i32>,
    pub real_score_team1: Option<i32>,
    pub real_score_team2: Option<i32>,

    pub is_event_program: bool,
    pub predicted_bonus_answer: Option<String>,
    pub bonus_answer: Option<String>,
}

impl ScoringRecord {
    pub fn scoring_input(&self) -> ScoringInput<'_> {
        ScoringInput {
            predicted_audience: Some(self.predicted_audience),
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
impl ScoringRecord {
    /// Audience-only prediction by user `user` on a TF1 show aired 2025-03-12 at 21:10.
    pub(crate) fn sample(user: u128, predicted: &str, real: Option<&str>) -> Self {
        let air_date = chrono::NaiveDate::from_ymd_opt(2025, 3, 12)
            .and_then(|d| d.and_hms_opt(21, 10, 0))
            .unwrap();

        Self {
            prediction_id: Uuid::new_v4(),
            user_id: Uuid::from_u128(user),
            username: format!("user{user}"),
            avatar_url: None,
            program_id: Uuid::new_v4(),
            program_name: "Koh-Lanta".to_string(),
            channel: "TF1".to_string(),
            genre: "Divertissement".to_string(),
            air_date,
            submitted_at: air_date - chrono::TimeDelta::hours(3),
            predicted_audience: predicted.parse().unwrap(),
            real_audience: real.map(|r| r.parse().unwrap()),
            allow_score_prediction: false,
            predicted_score_team1: None,
            predicted_score_team2: None,
            real_score_team1: None,
            real_score_team2: None,
            is_event_program: false,
            predicted_bonus_answer: None,
            bonus_answer: None,
        }
    }
}

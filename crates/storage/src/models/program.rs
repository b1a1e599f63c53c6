use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// A broadcast a user can forecast the audience of.
///
/// `real_audience` and the real match scores stay null until the show has aired
/// and its results have been reported by an administrator.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Program {
    pub program_id: Uuid,
    pub name: String,
    pub channel: String,
    pub air_date: NaiveDateTime,
    pub genre: String,
    pub image_url: Option<String>,
    pub description: Option<String>,
    /// Observed audience in millions of viewers.
    pub real_audience: Option<Decimal>,

    // Match score prediction
    pub allow_score_prediction: bool,
    pub team1_name: Option<String>,
    pub team2_name: Option<String>,
    pub real_score_team1: Option<i32>,
    pub real_score_team2: Option<i32>,

    // Event bonus question
    pub is_event_program: bool,
    pub bonus_title: Option<String>,
    pub bonus_choices: Vec<String>,
    pub bonus_answer: Option<String>,

    pub created_at: NaiveDateTime,
}

impl Program {
    pub fn has_results(&self) -> bool {
        self.real_audience.is_some()
    }
}

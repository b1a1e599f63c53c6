use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Request payload for creating a new program
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateProgramRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Name must be between 1 and 255 characters"
    ))]
    pub name: String,

    #[validate(length(min = 1, max = 100))]
    pub channel: String,

    /// Local air time, without time zone.
    pub air_date: NaiveDateTime,

    #[validate(length(min = 1, max = 100))]
    pub genre: String,

    pub image_url: Option<String>,

    pub description: Option<String>,

    #[serde(default)]
    pub allow_score_prediction: bool,

    #[validate(length(min = 1, max = 100))]
    pub team1_name: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub team2_name: Option<String>,

    #[serde(default)]
    pub is_event_program: bool,

    #[validate(length(min = 1, max = 255))]
    pub bonus_title: Option<String>,

    #[serde(default)]
    #[validate(custom(function = "validate_choices"))]
    pub bonus_choices: Vec<String>,
}

/// Request payload for updating an existing program
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateProgramRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub channel: Option<String>,

    pub air_date: Option<NaiveDateTime>,

    #[validate(length(min = 1, max = 100))]
    pub genre: Option<String>,

    pub image_url: Option<String>,

    pub description: Option<String>,

    pub allow_score_prediction: Option<bool>,

    #[validate(length(min = 1, max = 100))]
    pub team1_name: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub team2_name: Option<String>,

    pub is_event_program: Option<bool>,

    #[validate(length(min = 1, max = 255))]
    pub bonus_title: Option<String>,

    #[validate(custom(function = "validate_choices"))]
    pub bonus_choices: Option<Vec<String>>,
}

/// Observed results reported once the program has aired
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ProgramResultsRequest {
    /// Audience in millions of viewers.
    #[validate(custom(function = "validate_positive_audience"))]
    pub real_audience: Decimal,

    #[validate(range(min = 0, message = "Scores cannot be negative"))]
    pub real_score_team1: Option<i32>,

    #[validate(range(min = 0, message = "Scores cannot be negative"))]
    pub real_score_team2: Option<i32>,

    #[validate(length(min = 1, max = 255))]
    pub bonus_answer: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ProgramFilter {
    /// Only programs airing today or later.
    #[serde(default)]
    pub upcoming: bool,
    pub genre: Option<String>,
    pub channel: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RescoreResponse {
    pub rescored_predictions: u64,
}

// Validation helpers
fn validate_choices(choices: &[String]) -> Result<(), validator::ValidationError> {
    let all_filled = choices.iter().all(|c| !c.trim().is_empty() && c.len() <= 255);

    let mut seen: Vec<&str> = choices.iter().map(String::as_str).collect();
    seen.sort_unstable();
    seen.dedup();

    if all_filled && seen.len() == choices.len() {
        Ok(())
    } else {
        Err(validator::ValidationError::new("invalid_bonus_choices"))
    }
}

fn validate_positive_audience(audience: &Decimal) -> Result<(), validator::ValidationError> {
    if *audience > Decimal::ZERO {
        Ok(())
    } else {
        Err(validator::ValidationError::new("audience_must_be_positive"))
    }
}

impl CreateProgramRequest {
    /// Additional validation that requires multiple fields
    pub fn validate_modes(&self) -> Result<(), &'static str> {
        if self.is_event_program && self.bonus_title.is_none() {
            return Err("Event programs need a bonus title");
        }
        if !self.is_event_program && !self.bonus_choices.is_empty() {
            return Err("Bonus choices are only allowed on event programs");
        }

        Ok(())
    }
}

impl ProgramResultsRequest {
    /// Match scores are reported for both teams or not at all
    pub fn validate_scores(&self) -> Result<(), &'static str> {
        if self.real_score_team1.is_some() != self.real_score_team2.is_some() {
            return Err("Both team scores must be provided together");
        }

        Ok(())
    }
}

use chrono::{NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::dto::prediction::{CreatePredictionRequest, NewPrediction};
use crate::models::Program;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("predictions are closed for this program since {deadline}")]
    Closed { deadline: NaiveDateTime },

    #[error("predicted audience must be greater than {min} and at most {max} million")]
    AudienceOutOfRange { min: Decimal, max: Decimal },

    #[error("match scores cannot be negative")]
    NegativeScore,

    #[error("bonus answer is not one of the program's choices")]
    UnknownBonusAnswer,
}

/// Rules a prediction must satisfy to be accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionRules {
    /// Exclusive lower bound, in millions.
    pub min_audience: Decimal,
    /// Inclusive upper bound, in millions.
    pub max_audience: Decimal,
    /// Local hour of the air date at which submissions close.
    pub deadline_hour: u32,
}

impl Default for SubmissionRules {
    fn default() -> Self {
        Self {
            min_audience: Decimal::ZERO,
            max_audience: Decimal::TEN,
            deadline_hour: 22,
        }
    }
}

impl SubmissionRules {
    pub fn deadline(&self, air_date: NaiveDateTime) -> NaiveDateTime {
        let closing = NaiveTime::from_hms_opt(self.deadline_hour.min(23), 0, 0).unwrap_or(NaiveTime::MIN);
        air_date.date().and_time(closing)
    }

    pub fn is_open(&self, air_date: NaiveDateTime, now_local: NaiveDateTime) -> bool {
        now_local < self.deadline(air_date)
    }

    /// Checks a request against `program` and keeps only the fields the program accepts.
    pub fn prepare(
        &self,
        program: &Program,
        request: &CreatePredictionRequest,
        now_local: NaiveDateTime,
    ) -> Result<NewPrediction, SubmissionError> {
        if !self.is_open(program.air_date, now_local) {
            return Err(SubmissionError::Closed {
                deadline: self.deadline(program.air_date),
            });
        }

        let audience = request.predicted_audience;
        if audience <= self.min_audience || audience > self.max_audience {
            return Err(SubmissionError::AudienceOutOfRange {
                min: self.min_audience,
                max: self.max_audience,
            });
        }

        let scores = if program.allow_score_prediction {
            request.predicted_score_team1.zip(request.predicted_score_team2)
        } else {
            None
        };
        if scores.is_some_and(|(team1, team2)| team1 < 0 || team2 < 0) {
            return Err(SubmissionError::NegativeScore);
        }

        let bonus_answer = if program.is_event_program {
            request
                .predicted_bonus_answer
                .as_deref()
                .map(str::trim)
                .filter(|answer| !answer.is_empty())
        } else {
            None
        };
        if let Some(answer) = bonus_answer
            && !program.bonus_choices.is_empty()
            && !program.bonus_choices.iter().any(|choice| choice == answer)
        {
            return Err(SubmissionError::UnknownBonusAnswer);
        }

        Ok(NewPrediction {
            user_id: request.user_id,
            program_id: program.program_id,
            predicted_audience: audience,
            predicted_score_team1: scores.map(|(team1, _)| team1),
            predicted_score_team2: scores.map(|(_, team2)| team2),
            predicted_bonus_answer: bonus_answer.map(String::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, day)
            .and_then(|d| d.and_hms_opt(hour, minute, 0))
            .unwrap()
    }

    fn program() -> Program {
        Program {
            program_id: Uuid::from_u128(10),
            name: "France - Brésil".to_string(),
            channel: "TF1".to_string(),
            air_date: at(14, 21, 0),
            genre: "Football".to_string(),
            image_url: None,
            description: None,
            real_audience: None,
            allow_score_prediction: true,
            team1_name: Some("France".to_string()),
            team2_name: Some("Brésil".to_string()),
            real_score_team1: None,
            real_score_team2: None,
            is_event_program: true,
            bonus_title: Some("Premier buteur".to_string()),
            bonus_choices: vec!["Mbappé".to_string(), "Vinícius".to_string()],
            bonus_answer: None,
            created_at: at(1, 9, 0),
        }
    }

    fn request(audience: &str) -> CreatePredictionRequest {
        CreatePredictionRequest {
            user_id: Uuid::from_u128(1),
            program_id: Uuid::from_u128(10),
            predicted_audience: audience.parse().unwrap(),
            predicted_score_team1: Some(2),
            predicted_score_team2: Some(1),
            predicted_bonus_answer: Some(" Mbappé ".to_string()),
        }
    }

    #[test]
    fn test_deadline_is_22h_on_air_date() {
        let rules = SubmissionRules::default();
        assert_eq!(rules.deadline(at(14, 21, 0)), at(14, 22, 0));
        assert!(rules.is_open(at(14, 21, 0), at(14, 21, 59)));
        assert!(!rules.is_open(at(14, 21, 0), at(14, 22, 0)));
        assert!(!rules.is_open(at(14, 21, 0), at(15, 8, 0)));
        assert!(rules.is_open(at(14, 21, 0), at(13, 23, 30)));
    }

    #[test]
    fn test_prepare_keeps_accepted_fields() {
        let prepared = SubmissionRules::default()
            .prepare(&program(), &request("6.2"), at(14, 12, 0))
            .unwrap();

        assert_eq!(prepared.predicted_score_team1, Some(2));
        assert_eq!(prepared.predicted_score_team2, Some(1));
        assert_eq!(prepared.predicted_bonus_answer.as_deref(), Some("Mbappé"));
    }

    #[test]
    fn test_prepare_drops_fields_the_program_does_not_offer() {
        let mut plain = program();
        plain.allow_score_prediction = false;
        plain.is_event_program = false;

        let prepared = SubmissionRules::default()
            .prepare(&plain, &request("6.2"), at(14, 12, 0))
            .unwrap();

        assert_eq!(prepared.predicted_score_team1, None);
        assert_eq!(prepared.predicted_score_team2, None);
        assert_eq!(prepared.predicted_bonus_answer, None);
    }

    #[test]
    fn test_prepare_rejects_late_submission() {
        let err = SubmissionRules::default()
            .prepare(&program(), &request("6.2"), at(14, 22, 15))
            .unwrap_err();
        assert_eq!(err, SubmissionError::Closed { deadline: at(14, 22, 0) });
    }

    #[test]
    fn test_prepare_rejects_out_of_range_audience() {
        let rules = SubmissionRules::default();
        for audience in ["0", "-1", "10.001"] {
            let err = rules
                .prepare(&program(), &request(audience), at(14, 12, 0))
                .unwrap_err();
            assert!(matches!(err, SubmissionError::AudienceOutOfRange { .. }));
        }
        assert!(rules.prepare(&program(), &request("10"), at(14, 12, 0)).is_ok());
    }

    #[test]
    fn test_prepare_rejects_unknown_bonus_answer() {
        let mut req = request("6.2");
        req.predicted_bonus_answer = Some("Zidane".to_string());
        let err = SubmissionRules::default()
            .prepare(&program(), &req, at(14, 12, 0))
            .unwrap_err();
        assert_eq!(err, SubmissionError::UnknownBonusAnswer);
    }

    #[test]
    fn test_prepare_rejects_negative_score() {
        let mut req = request("6.2");
        req.predicted_score_team2 = Some(-1);
        let err = SubmissionRules::default()
            .prepare(&program(), &req, at(14, 12, 0))
            .unwrap_err();
        assert_eq!(err, SubmissionError::NegativeScore);
    }
}

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Accuracy thresholds (inclusive lower bounds) and their point value, highest first.
const SCORE_BRACKETS: [(i64, i32); 7] = [
    (95, 100),
    (90, 80),
    (85, 60),
    (80, 50),
    (70, 30),
    (60, 20),
    (50, 10),
];

/// Everything the scoring engine needs to know about one prediction.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringInput<'a> {
    pub predicted_audience: Option<Decimal>,
    pub real_audience: Option<Decimal>,
    pub allow_score_prediction: bool,
    pub predicted_scores: Option<(i32, i32)>,
    pub real_scores: Option<(i32, i32)>,
    pub is_event_program: bool,
    pub predicted_bonus_answer: Option<&'a str>,
    pub bonus_answer: Option<&'a str>,
}

/// How a match-score prediction compares to the final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MatchOutcome {
    /// Both team scores are right: points are doubled.
    Exact,
    /// Winner (or draw) is right but not the score: points are increased by half.
    CorrectOutcome,
    /// Wrong winner: the prediction scores nothing.
    WrongOutcome,
    NotApplicable,
}

impl MatchOutcome {
    fn apply(self, points: Decimal) -> Decimal {
        match self {
            Self::Exact => points * Decimal::TWO,
            Self::CorrectOutcome => points * Decimal::new(15, 1),
            Self::WrongOutcome => Decimal::ZERO,
            Self::NotApplicable => points,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ScoreBreakdown {
    /// Closeness percentage with two decimals, `None` while the real audience is unknown.
    pub calculated_accuracy: Option<Decimal>,
    pub calculated_score: i32,
    pub total_score: i32,
    pub match_outcome: MatchOutcome,
    pub event_bonus: bool,
}

impl ScoreBreakdown {
    pub fn is_resolved(&self) -> bool {
        self.calculated_accuracy.is_some()
    }
}

/// Symmetric closeness between a forecast and the observed value, as a percentage.
///
/// Returns `None` when either side is missing or not strictly positive, which
/// callers treat as "not scored yet".
pub fn calculate_accuracy(predicted: Option<Decimal>, actual: Option<Decimal>) -> Option<Decimal> {
    let (predicted, actual) = predicted.zip(actual)?;
    if predicted <= Decimal::ZERO || actual <= Decimal::ZERO {
        return None;
    }

    let ratio = predicted.min(actual) / predicted.max(actual);

    Some((ratio * Decimal::ONE_HUNDRED).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

pub fn base_score(accuracy: Option<Decimal>) -> i32 {
    let Some(accuracy) = accuracy else {
        return 0;
    };

    SCORE_BRACKETS
        .iter()
        .find(|(threshold, _)| accuracy >= Decimal::from(*threshold))
        .map(|(_, points)| *points)
        .unwrap_or(0)
}

pub fn match_outcome(
    allow_score_prediction: bool,
    predicted: Option<(i32, i32)>,
    real: Option<(i32, i32)>,
) -> MatchOutcome {
    if !allow_score_prediction {
        return MatchOutcome::NotApplicable;
    }
    let (Some(predicted), Some(real)) = (predicted, real) else {
        return MatchOutcome::NotApplicable;
    };

    if predicted == real {
        MatchOutcome::Exact
    } else if predicted.0.cmp(&predicted.1) == real.0.cmp(&real.1) {
        MatchOutcome::CorrectOutcome
    } else {
        MatchOutcome::WrongOutcome
    }
}

/// True when an event program's bonus question was answered exactly right.
pub fn event_bonus_hit(
    is_event_program: bool,
    predicted_answer: Option<&str>,
    correct_answer: Option<&str>,
) -> bool {
    if !is_event_program {
        return false;
    }

    match (predicted_answer, correct_answer) {
        (Some(predicted), Some(correct)) if !correct.trim().is_empty() => predicted == correct,
        _ => false,
    }
}

/// Scores one prediction: base points, then the match adjustment, then the event bonus.
///
/// Intermediate values keep full decimal precision; only the total is rounded.
pub fn score_prediction(input: &ScoringInput<'_>) -> ScoreBreakdown {
    let calculated_accuracy = calculate_accuracy(input.predicted_audience, input.real_audience);
    let calculated_score = base_score(calculated_accuracy);
    let match_outcome = match_outcome(
        input.allow_score_prediction,
        input.predicted_scores,
        input.real_scores,
    );
    let event_bonus = event_bonus_hit(
        input.is_event_program,
        input.predicted_bonus_answer,
        input.bonus_answer,
    );

    let total_score = if calculated_accuracy.is_none() {
        0
    } else {
        let mut total = match_outcome.apply(Decimal::from(calculated_score));
        if event_bonus {
            total *= Decimal::TWO;
        }
        total
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i32()
            .unwrap_or(0)
    };

    ScoreBreakdown {
        calculated_accuracy,
        calculated_score,
        total_score,
        match_outcome,
        event_bonus,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    fn audience_only(predicted: &str, real: &str) -> ScoringInput<'static> {
        ScoringInput {
            predicted_audience: Some(d(predicted)),
            real_audience: Some(d(real)),
            ..Default::default()
        }
    }

    #[test]
    fn test_accuracy_is_symmetric() {
        let pairs = [("4.6", "5.0"), ("1.234", "7.5"), ("0.3", "9.99"), ("3", "3.3")];
        for (a, b) in pairs {
            assert_eq!(
                calculate_accuracy(Some(d(a)), Some(d(b))),
                calculate_accuracy(Some(d(b)), Some(d(a)))
            );
        }
    }

    #[test]
    fn test_accuracy_of_exact_forecast_is_hundred() {
        for value in ["0.5", "4.6", "10"] {
            assert_eq!(calculate_accuracy(Some(d(value)), Some(d(value))), Some(d("100")));
        }
    }

    #[test]
    fn test_accuracy_undefined_for_missing_or_zero() {
        assert_eq!(calculate_accuracy(Some(d("4.6")), None), None);
        assert_eq!(calculate_accuracy(None, Some(d("5.0"))), None);
        assert_eq!(calculate_accuracy(Some(Decimal::ZERO), Some(d("5.0"))), None);
        assert_eq!(calculate_accuracy(Some(d("4.6")), Some(Decimal::ZERO)), None);
        assert_eq!(calculate_accuracy(Some(d("-1")), Some(d("5.0"))), None);
    }

    #[test]
    fn test_accuracy_rounds_to_two_decimals() {
        // 1 / 3 = 33.333...
        assert_eq!(calculate_accuracy(Some(d("1")), Some(d("3"))), Some(d("33.33")));
        // 2 / 3 = 66.666...
        assert_eq!(calculate_accuracy(Some(d("2")), Some(d("3"))), Some(d("66.67")));
    }

    #[test]
    fn test_base_score_brackets() {
        let cases = [
            ("100", 100),
            ("95", 100),
            ("94.99", 80),
            ("90", 80),
            ("89.99", 60),
            ("85", 60),
            ("80", 50),
            ("79.99", 30),
            ("70", 30),
            ("60", 20),
            ("50", 10),
            ("49.99", 0),
            ("0.01", 0),
        ];
        for (accuracy, expected) in cases {
            assert_eq!(base_score(Some(d(accuracy))), expected, "accuracy {accuracy}");
        }
        assert_eq!(base_score(None), 0);
    }

    #[test]
    fn test_base_score_is_monotonic() {
        let mut previous = 0;
        for hundredths in 0..=10_000 {
            let score = base_score(Some(Decimal::new(hundredths, 2)));
            assert!(score >= previous);
            previous = score;
        }
    }

    #[test]
    fn test_match_outcome() {
        assert_eq!(match_outcome(true, Some((2, 1)), Some((2, 1))), MatchOutcome::Exact);
        assert_eq!(match_outcome(true, Some((2, 1)), Some((3, 1))), MatchOutcome::CorrectOutcome);
        assert_eq!(match_outcome(true, Some((1, 1)), Some((0, 0))), MatchOutcome::CorrectOutcome);
        assert_eq!(match_outcome(true, Some((2, 1)), Some((1, 2))), MatchOutcome::WrongOutcome);
        assert_eq!(match_outcome(true, Some((1, 1)), Some((2, 1))), MatchOutcome::WrongOutcome);
        assert_eq!(match_outcome(false, Some((2, 1)), Some((2, 1))), MatchOutcome::NotApplicable);
        assert_eq!(match_outcome(true, None, Some((2, 1))), MatchOutcome::NotApplicable);
        assert_eq!(match_outcome(true, Some((2, 1)), None), MatchOutcome::NotApplicable);
    }

    #[test]
    fn test_event_bonus_hit() {
        assert!(event_bonus_hit(true, Some("20-25%"), Some("20-25%")));
        assert!(!event_bonus_hit(true, Some("20-25%"), Some("25-30%")));
        assert!(!event_bonus_hit(false, Some("20-25%"), Some("20-25%")));
        assert!(!event_bonus_hit(true, None, Some("20-25%")));
        assert!(!event_bonus_hit(true, Some(""), Some("")));
        assert!(!event_bonus_hit(true, Some("Oui"), None));
    }

    #[test]
    fn test_audience_only_prediction() {
        let breakdown = score_prediction(&audience_only("4.6", "5.0"));
        assert_eq!(breakdown.calculated_accuracy, Some(d("92")));
        assert_eq!(breakdown.calculated_score, 80);
        assert_eq!(breakdown.total_score, 80);
        assert_eq!(breakdown.match_outcome, MatchOutcome::NotApplicable);
        assert!(!breakdown.event_bonus);
    }

    #[test]
    fn test_football_correct_outcome() {
        let input = ScoringInput {
            allow_score_prediction: true,
            predicted_scores: Some((2, 1)),
            real_scores: Some((3, 1)),
            ..audience_only("4.6", "5.0")
        };
        assert_eq!(score_prediction(&input).total_score, 120);
    }

    #[test]
    fn test_football_exact_score() {
        let input = ScoringInput {
            allow_score_prediction: true,
            predicted_scores: Some((3, 1)),
            real_scores: Some((3, 1)),
            ..audience_only("4.6", "5.0")
        };
        assert_eq!(score_prediction(&input).total_score, 160);
    }

    #[test]
    fn test_football_wrong_outcome_zeroes_score() {
        let input = ScoringInput {
            allow_score_prediction: true,
            predicted_scores: Some((2, 1)),
            real_scores: Some((1, 2)),
            ..audience_only("4.6", "5.0")
        };
        let breakdown = score_prediction(&input);
        assert_eq!(breakdown.calculated_score, 80);
        assert_eq!(breakdown.total_score, 0);
    }

    #[test]
    fn test_event_bonus_doubles_score() {
        let input = ScoringInput {
            is_event_program: true,
            predicted_bonus_answer: Some("Oui"),
            bonus_answer: Some("Oui"),
            ..audience_only("4.6", "5.0")
        };
        let breakdown = score_prediction(&input);
        assert!(breakdown.event_bonus);
        assert_eq!(breakdown.total_score, 160);
    }

    #[test]
    fn test_event_bonus_stacks_after_match_bonus() {
        let input = ScoringInput {
            allow_score_prediction: true,
            predicted_scores: Some((2, 1)),
            real_scores: Some((3, 1)),
            is_event_program: true,
            predicted_bonus_answer: Some("Mbappé"),
            bonus_answer: Some("Mbappé"),
            ..audience_only("4.6", "5.0")
        };
        assert_eq!(score_prediction(&input).total_score, 240);
    }

    #[test]
    fn test_pending_program_scores_nothing() {
        let input = ScoringInput {
            predicted_audience: Some(d("4.6")),
            real_audience: None,
            allow_score_prediction: true,
            predicted_scores: Some((2, 1)),
            real_scores: Some((2, 1)),
            is_event_program: true,
            predicted_bonus_answer: Some("Oui"),
            bonus_answer: Some("Oui"),
        };
        let breakdown = score_prediction(&input);
        assert_eq!(breakdown.calculated_accuracy, None);
        assert_eq!(breakdown.calculated_score, 0);
        assert_eq!(breakdown.total_score, 0);
        assert!(!breakdown.is_resolved());
    }
}

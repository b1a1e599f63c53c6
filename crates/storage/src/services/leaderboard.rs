use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dto::leaderboard::{LeaderboardEntry, LeaderboardStats, LeaderboardView, PreviousRank, Trend};
use crate::error::Result;
use crate::models::ScoringRecord;
use crate::repository::store::{RecordFilter, ScoringStore};
use crate::services::scoring::{ScoreBreakdown, score_prediction};

/// Totals over a set of scored predictions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ToSchema)]
pub struct ScoreSummary {
    pub total_score: i64,
    /// Mean accuracy of resolved predictions, two decimals; zero when none is resolved.
    pub precision_score: Decimal,
    pub predictions_count: i64,
    pub resolved_count: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserTotals {
    pub user_id: Uuid,
    pub username: String,
    pub avatar_url: Option<String>,
    pub summary: ScoreSummary,
}

/// Previous rank of each user, supplied by the caller for trend computation.
#[derive(Debug, Clone, Default)]
pub struct RankingSnapshot {
    ranks: HashMap<Uuid, i64>,
}

impl RankingSnapshot {
    pub fn rank_of(&self, user_id: &Uuid) -> Option<i64> {
        self.ranks.get(user_id).copied()
    }
}

impl From<&[PreviousRank]> for RankingSnapshot {
    fn from(previous: &[PreviousRank]) -> Self {
        Self {
            ranks: previous.iter().map(|p| (p.user_id, p.rank)).collect(),
        }
    }
}

impl From<&[LeaderboardEntry]> for RankingSnapshot {
    fn from(entries: &[LeaderboardEntry]) -> Self {
        Self {
            ranks: entries.iter().map(|e| (e.user_id, e.rank)).collect(),
        }
    }
}

pub fn summarize<'a>(scores: impl IntoIterator<Item = &'a ScoreBreakdown>) -> ScoreSummary {
    let mut summary = ScoreSummary::default();
    let mut accuracy_sum = Decimal::ZERO;

    for score in scores {
        summary.predictions_count += 1;
        summary.total_score += i64::from(score.total_score);
        if let Some(accuracy) = score.calculated_accuracy {
            accuracy_sum += accuracy;
            summary.resolved_count += 1;
        }
    }

    if summary.resolved_count > 0 {
        summary.precision_score = (accuracy_sum / Decimal::from(summary.resolved_count))
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    }

    summary
}

/// Orders users and assigns 1-based positional ranks.
///
/// Order: total score, then precision, then prediction count (all descending),
/// then username and user id so equal entries always come out the same way.
pub fn rank_users(mut totals: Vec<UserTotals>) -> Vec<LeaderboardEntry> {
    totals.sort_by(|a, b| {
        b.summary
            .total_score
            .cmp(&a.summary.total_score)
            .then_with(|| b.summary.precision_score.cmp(&a.summary.precision_score))
            .then_with(|| b.summary.predictions_count.cmp(&a.summary.predictions_count))
            .then_with(|| a.username.cmp(&b.username))
            .then_with(|| a.user_id.cmp(&b.user_id))
    });

    totals
        .into_iter()
        .enumerate()
        .map(|(index, user)| LeaderboardEntry {
            rank: index as i64 + 1,
            user_id: user.user_id,
            username: user.username,
            avatar_url: user.avatar_url,
            total_score: user.summary.total_score,
            precision_score: user.summary.precision_score.to_f64().unwrap_or(0.0),
            predictions_count: user.summary.predictions_count,
            trend: None,
        })
        .collect()
}

pub fn build_leaderboard(records: &[ScoringRecord]) -> Vec<LeaderboardEntry> {
    let mut by_user: BTreeMap<Uuid, (&ScoringRecord, Vec<ScoreBreakdown>)> = BTreeMap::new();

    for record in records {
        let breakdown = score_prediction(&record.scoring_input());
        by_user
            .entry(record.user_id)
            .or_insert_with(|| (record, Vec::new()))
            .1
            .push(breakdown);
    }

    let totals = by_user
        .into_iter()
        .map(|(user_id, (first, scores))| UserTotals {
            user_id,
            username: first.username.clone(),
            avatar_url: first.avatar_url.clone(),
            summary: summarize(&scores),
        })
        .collect();

    rank_users(totals)
}

pub fn apply_trends(entries: &mut [LeaderboardEntry], previous: &RankingSnapshot) {
    for entry in entries {
        entry.trend = match previous.rank_of(&entry.user_id) {
            None => Some(Trend::New),
            Some(rank) if entry.rank < rank => Some(Trend::Up),
            Some(rank) if entry.rank > rank => Some(Trend::Down),
            Some(_) => None,
        };
    }
}

pub fn leaderboard_stats(entries: &[LeaderboardEntry], registered_users: i64) -> LeaderboardStats {
    let top_scorer = entries.iter().max_by_key(|e| e.total_score);
    let top_precision = entries
        .iter()
        .max_by(|a, b| a.precision_score.total_cmp(&b.precision_score));

    LeaderboardStats {
        top_score: top_scorer.map(|e| e.total_score).unwrap_or(0),
        top_scorer: top_scorer.map(|e| e.username.clone()),
        top_precision: top_precision.map(|e| e.precision_score).unwrap_or(0.0),
        top_precision_user: top_precision.map(|e| e.username.clone()),
        active_players: entries.iter().filter(|e| e.total_score > 0).count() as i64,
        registered_users,
    }
}

/// Ranks every user with at least one prediction in `view` as of `today`.
pub async fn compute_leaderboard<S: ScoringStore + ?Sized>(
    store: &S,
    view: &LeaderboardView,
    today: NaiveDate,
) -> Result<Vec<LeaderboardEntry>> {
    let filter = RecordFilter::for_view(view, today);
    let records = store.scoring_records(&filter).await?;

    Ok(build_leaderboard(&records))
}

/// Stats over an already computed all-time board.
pub async fn compute_stats<S: ScoringStore + ?Sized>(
    store: &S,
    entries: &[LeaderboardEntry],
) -> Result<LeaderboardStats> {
    let registered_users = store.registered_users().await?;

    Ok(leaderboard_stats(entries, registered_users))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::leaderboard::TimeWindow;
    use crate::repository::store::MemoryStore;

    fn d(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    fn entry(user: u128, rank: i64) -> LeaderboardEntry {
        LeaderboardEntry {
            rank,
            user_id: Uuid::from_u128(user),
            username: format!("user{user}"),
            avatar_url: None,
            total_score: 0,
            precision_score: 0.0,
            predictions_count: 1,
            trend: None,
        }
    }

    #[test]
    fn test_summary_ignores_pending_in_precision() {
        let records = [
            ScoringRecord::sample(1, "4.6", Some("5.0")),
            ScoringRecord::sample(1, "3.0", Some("5.0")),
            ScoringRecord::sample(1, "2.0", None),
        ];
        let scores: Vec<ScoreBreakdown> = records
            .iter()
            .map(|r| score_prediction(&r.scoring_input()))
            .collect();

        let summary = summarize(&scores);

        assert_eq!(summary.total_score, 100);
        assert_eq!(summary.precision_score, d("76"));
        assert_eq!(summary.predictions_count, 3);
        assert_eq!(summary.resolved_count, 2);
    }

    #[test]
    fn test_summary_without_resolved_predictions() {
        let record = ScoringRecord::sample(1, "2.0", None);
        let summary = summarize(&[score_prediction(&record.scoring_input())]);
        assert_eq!(summary.total_score, 0);
        assert_eq!(summary.precision_score, Decimal::ZERO);
        assert_eq!(summary.predictions_count, 1);
    }

    #[test]
    fn test_build_leaderboard_ranks_by_total_score() {
        let records = vec![
            ScoringRecord::sample(1, "4.6", Some("5.0")),
            ScoringRecord::sample(1, "3.0", Some("5.0")),
            ScoringRecord::sample(2, "5.0", Some("5.0")),
            ScoringRecord::sample(2, "4.8", Some("5.0")),
            ScoringRecord::sample(3, "1.0", Some("5.0")),
        ];

        let board = build_leaderboard(&records);

        let order: Vec<(i64, u128, i64)> = board
            .iter()
            .map(|e| (e.rank, e.user_id.as_u128(), e.total_score))
            .collect();
        assert_eq!(order, vec![(1, 2, 200), (2, 1, 100), (3, 3, 0)]);
        assert_eq!(board[1].precision_score, 76.0);
        assert_eq!(board[1].predictions_count, 2);
    }

    #[test]
    fn test_ties_break_on_precision_then_name() {
        let records = vec![
            // 80 points, 90% accuracy
            ScoringRecord::sample(1, "4.5", Some("5.0")),
            // 80 points, 92% accuracy
            ScoringRecord::sample(2, "4.6", Some("5.0")),
            // 80 points, 92% accuracy
            ScoringRecord::sample(3, "4.6", Some("5.0")),
        ];

        let board = build_leaderboard(&records);

        let users: Vec<u128> = board.iter().map(|e| e.user_id.as_u128()).collect();
        assert_eq!(users, vec![2, 3, 1]);
        let ranks: Vec<i64> = board.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
    }

    #[test]
    fn test_trends_against_previous_snapshot() {
        let mut current = vec![entry(1, 1), entry(2, 2), entry(3, 3), entry(4, 4)];
        let previous = [
            PreviousRank { user_id: Uuid::from_u128(1), rank: 2 },
            PreviousRank { user_id: Uuid::from_u128(2), rank: 1 },
            PreviousRank { user_id: Uuid::from_u128(3), rank: 3 },
        ];

        apply_trends(&mut current, &RankingSnapshot::from(&previous[..]));

        let trends: Vec<Option<Trend>> = current.iter().map(|e| e.trend).collect();
        assert_eq!(
            trends,
            vec![Some(Trend::Up), Some(Trend::Down), None, Some(Trend::New)]
        );
    }

    #[test]
    fn test_stats() {
        let mut first = entry(1, 1);
        first.total_score = 180;
        first.precision_score = 81.5;
        let mut second = entry(2, 2);
        second.total_score = 60;
        second.precision_score = 93.25;
        let third = entry(3, 3);

        let stats = leaderboard_stats(&[first, second, third], 10);

        assert_eq!(stats.top_score, 180);
        assert_eq!(stats.top_scorer.as_deref(), Some("user1"));
        assert_eq!(stats.top_precision, 93.25);
        assert_eq!(stats.top_precision_user.as_deref(), Some("user2"));
        assert_eq!(stats.active_players, 2);
        assert_eq!(stats.registered_users, 10);
    }

    #[test]
    fn test_stats_of_empty_board() {
        let stats = leaderboard_stats(&[], 3);
        assert_eq!(stats.top_score, 0);
        assert_eq!(stats.top_scorer, None);
        assert_eq!(stats.active_players, 0);
    }

    #[tokio::test]
    async fn test_compute_leaderboard_filters_window_and_dimension() {
        let mut this_week = ScoringRecord::sample(1, "5.0", Some("5.0"));
        this_week.channel = "France 2".to_string();
        let mut last_month = ScoringRecord::sample(2, "5.0", Some("5.0"));
        last_month.air_date = last_month.air_date - chrono::TimeDelta::days(30);
        let store = MemoryStore::new(vec![this_week, last_month]);
        let today = NaiveDate::from_ymd_opt(2025, 3, 13).unwrap();

        let all_time = compute_leaderboard(&store, &LeaderboardView::default(), today)
            .await
            .unwrap();
        assert_eq!(all_time.len(), 2);

        let week = LeaderboardView {
            window: TimeWindow::Week,
            ..Default::default()
        };
        let weekly = compute_leaderboard(&store, &week, today).await.unwrap();
        assert_eq!(weekly.len(), 1);
        assert_eq!(weekly[0].user_id, Uuid::from_u128(1));

        let tf1 = LeaderboardView {
            channel: Some("TF1".to_string()),
            ..Default::default()
        };
        let by_channel = compute_leaderboard(&store, &tf1, today).await.unwrap();
        assert_eq!(by_channel.len(), 1);
        assert_eq!(by_channel[0].user_id, Uuid::from_u128(2));
    }

    #[tokio::test]
    async fn test_compute_stats_uses_registered_users() {
        let store = MemoryStore::new(vec![
            ScoringRecord::sample(1, "4.6", Some("5.0")),
            ScoringRecord::sample(2, "1.0", Some("5.0")),
        ])
        .with_registered_users(7);
        let today = NaiveDate::from_ymd_opt(2025, 3, 13).unwrap();

        let board = compute_leaderboard(&store, &LeaderboardView::default(), today)
            .await
            .unwrap();
        let stats = compute_stats(&store, &board).await.unwrap();

        assert_eq!(stats.top_score, 80);
        assert_eq!(stats.active_players, 1);
        assert_eq!(stats.registered_users, 7);
    }
}

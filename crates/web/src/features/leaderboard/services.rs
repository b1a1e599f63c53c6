use std::sync::Arc;

use storage::{
    dto::leaderboard::{LeaderboardEntry, LeaderboardStats, LeaderboardView, TrendRequest},
    error::Result,
    repository::prediction::PredictionRepository,
    services::leaderboard::{RankingSnapshot, apply_trends, compute_leaderboard, compute_stats},
};

use crate::state::AppState;

/// Leaderboard for `view` as of today, served from the cache when possible
pub async fn get_leaderboard(
    state: &AppState,
    view: &LeaderboardView,
) -> Result<Arc<Vec<LeaderboardEntry>>> {
    let today = state.today();
    let pool = state.db.pool();

    state
        .cache
        .get_or_compute(view, today, || async move {
            tracing::debug!(?view, %today, "Computing leaderboard");
            compute_leaderboard(&PredictionRepository::new(pool), view, today).await
        })
        .await
}

/// Leaderboard with each entry's movement against the caller's previous ranking
pub async fn get_leaderboard_with_trends(
    state: &AppState,
    request: &TrendRequest,
) -> Result<Vec<LeaderboardEntry>> {
    let mut entries = get_leaderboard(state, &request.view).await?.as_ref().clone();
    apply_trends(&mut entries, &RankingSnapshot::from(&request.previous[..]));

    Ok(entries)
}

pub async fn get_stats(state: &AppState) -> Result<LeaderboardStats> {
    let entries = get_leaderboard(state, &LeaderboardView::default()).await?;

    compute_stats(&PredictionRepository::new(state.db.pool()), &entries).await
}

use axum::{
    Router,
    routing::{get, post},
};

use super::handlers::{get_leaderboard, get_leaderboard_stats, get_leaderboard_trend};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_leaderboard))
        .route("/trend", post(get_leaderboard_trend))
        .route("/stats", get(get_leaderboard_stats))
}

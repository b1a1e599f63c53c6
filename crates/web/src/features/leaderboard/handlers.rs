use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use storage::dto::{
    common::PaginatedResponse,
    leaderboard::{LeaderboardEntry, LeaderboardFilter, LeaderboardStats, TrendRequest},
};

use crate::error::{WebError, WebResult};
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/api/leaderboard",
    params(LeaderboardFilter),
    responses(
        (status = 200, description = "Ranked players for the requested window", body = PaginatedResponse<LeaderboardEntry>),
        (status = 400, description = "Invalid filter parameters")
    ),
    tag = "leaderboard"
)]
pub async fn get_leaderboard(
    State(state): State<AppState>,
    Query(filter): Query<LeaderboardFilter>,
) -> WebResult<Response> {
    filter.validate().map_err(WebError::BadRequest)?;

    let entries = services::get_leaderboard(&state, &filter.view()).await?;
    let page = filter.pagination().paginate(&entries);

    Ok(Json(page).into_response())
}

#[utoipa::path(
    post,
    path = "/api/leaderboard/trend",
    request_body = TrendRequest,
    responses(
        (status = 200, description = "Full leaderboard with movement against the previous ranking", body = Vec<LeaderboardEntry>),
        (status = 400, description = "Invalid filter")
    ),
    tag = "leaderboard"
)]
pub async fn get_leaderboard_trend(
    State(state): State<AppState>,
    Json(payload): Json<TrendRequest>,
) -> WebResult<Response> {
    payload.view.validate().map_err(WebError::BadRequest)?;

    let entries = services::get_leaderboard_with_trends(&state, &payload).await?;

    Ok(Json(entries).into_response())
}

#[utoipa::path(
    get,
    path = "/api/leaderboard/stats",
    responses(
        (status = 200, description = "All-time leaderboard statistics", body = LeaderboardStats)
    ),
    tag = "leaderboard"
)]
pub async fn get_leaderboard_stats(State(state): State<AppState>) -> WebResult<Response> {
    let stats = services::get_stats(&state).await?;

    Ok(Json(stats).into_response())
}

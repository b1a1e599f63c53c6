use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::common::PaginationParams;

/// Period of air dates a leaderboard covers, relative to the current local date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum TimeWindow {
    #[default]
    AllTime,
    /// January to June, or July to December.
    Semester,
    Month,
    /// ISO week, starting on Monday.
    Week,
}

impl TimeWindow {
    /// Half-open `[start, end)` date range covered on `today`, `None` for all-time.
    pub fn bounds(self, today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        match self {
            Self::AllTime => None,
            Self::Week => {
                let start = today - Days::new(u64::from(today.weekday().num_days_from_monday()));
                Some((start, start + Days::new(7)))
            }
            Self::Month => {
                let start = today.with_day(1)?;
                Some((start, start.checked_add_months(Months::new(1))?))
            }
            Self::Semester => {
                let first_month = if today.month() <= 6 { 1 } else { 7 };
                let start = NaiveDate::from_ymd_opt(today.year(), first_month, 1)?;
                Some((start, start.checked_add_months(Months::new(6))?))
            }
        }
    }
}

/// Which slice of predictions a leaderboard ranks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize, Serialize, ToSchema)]
pub struct LeaderboardView {
    #[serde(default)]
    pub window: TimeWindow,
    pub genre: Option<String>,
    pub channel: Option<String>,
}

impl LeaderboardView {
    pub fn validate(&self) -> Result<(), String> {
        if self.genre.as_deref().is_some_and(|g| g.trim().is_empty()) {
            return Err("genre must not be empty".to_string());
        }
        if self.channel.as_deref().is_some_and(|c| c.trim().is_empty()) {
            return Err("channel must not be empty".to_string());
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct LeaderboardFilter {
    #[serde(default)]
    pub window: TimeWindow,
    pub genre: Option<String>,
    pub channel: Option<String>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    50
}

impl LeaderboardFilter {
    pub fn validate(&self) -> Result<(), String> {
        self.pagination().validate()?;
        self.view().validate()
    }

    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            page_size: self.page_size,
        }
    }

    pub fn view(&self) -> LeaderboardView {
        LeaderboardView {
            window: self.window,
            genre: self.genre.clone(),
            channel: self.channel.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    New,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct LeaderboardEntry {
    pub rank: i64,
    pub user_id: Uuid,
    pub username: String,
    pub avatar_url: Option<String>,
    pub total_score: i64,
    /// Mean accuracy over predictions whose program has a known audience.
    pub precision_score: f64,
    pub predictions_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<Trend>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct PreviousRank {
    pub user_id: Uuid,
    pub rank: i64,
}

/// Leaderboard request carrying the caller's previous ranking to compare against.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct TrendRequest {
    #[serde(flatten)]
    pub view: LeaderboardView,
    pub previous: Vec<PreviousRank>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct LeaderboardStats {
    pub top_score: i64,
    pub top_scorer: Option<String>,
    pub top_precision: f64,
    pub top_precision_user: Option<String>,
    /// Players with a positive total score.
    pub active_players: i64,
    pub registered_users: i64,
}

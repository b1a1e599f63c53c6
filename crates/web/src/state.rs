use std::sync::Arc;

use chrono::{FixedOffset, NaiveDate, NaiveDateTime, Utc};
use storage::Database;
use storage::services::submission::SubmissionRules;

use crate::cache::LeaderboardCache;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub cache: Arc<LeaderboardCache>,
    pub rules: SubmissionRules,
    pub utc_offset: FixedOffset,
}

impl AppState {
    /// Current wall-clock time in the broadcast time zone.
    pub fn now_local(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.utc_offset).naive_local()
    }

    pub fn today(&self) -> NaiveDate {
        self.now_local().date()
    }
}

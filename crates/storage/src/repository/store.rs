use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::dto::leaderboard::LeaderboardView;
use crate::error::Result;
use crate::models::ScoringRecord;

/// Selection of scoring records. All set criteria must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    /// Inclusive lower bound on the program air date.
    pub from: Option<NaiveDate>,
    /// Exclusive upper bound on the program air date.
    pub until: Option<NaiveDate>,
    pub genre: Option<String>,
    pub channel: Option<String>,
    pub user_id: Option<Uuid>,
    pub program_id: Option<Uuid>,
}

impl RecordFilter {
    pub fn for_view(view: &LeaderboardView, today: NaiveDate) -> Self {
        let (from, until) = view.window.bounds(today).unzip();
        Self {
            from,
            until,
            genre: view.genre.clone(),
            channel: view.channel.clone(),
            ..Self::default()
        }
    }

    pub fn for_user(user_id: Uuid) -> Self {
        Self {
            user_id: Some(user_id),
            ..Self::default()
        }
    }

    pub fn for_program(program_id: Uuid) -> Self {
        Self {
            program_id: Some(program_id),
            ..Self::default()
        }
    }

    pub fn matches(&self, record: &ScoringRecord) -> bool {
        let air_date = record.air_date.date();

        self.from.is_none_or(|from| air_date >= from)
            && self.until.is_none_or(|until| air_date < until)
            && self.genre.as_ref().is_none_or(|genre| &record.genre == genre)
            && self.channel.as_ref().is_none_or(|channel| &record.channel == channel)
            && self.user_id.is_none_or(|id| record.user_id == id)
            && self.program_id.is_none_or(|id| record.program_id == id)
    }
}

/// Read access to everything scoring and ranking need.
#[async_trait]
pub trait ScoringStore: Send + Sync {
    async fn scoring_records(&self, filter: &RecordFilter) -> Result<Vec<ScoringRecord>>;

    async fn registered_users(&self) -> Result<i64>;
}

/// Store over a fixed set of records, used for previews and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<ScoringRecord>,
    registered_users: i64,
}

impl MemoryStore {
    pub fn new(records: Vec<ScoringRecord>) -> Self {
        let mut users: Vec<Uuid> = records.iter().map(|r| r.user_id).collect();
        users.sort_unstable();
        users.dedup();

        Self {
            registered_users: users.len() as i64,
            records,
        }
    }

    pub fn with_registered_users(mut self, count: i64) -> Self {
        self.registered_users = count;
        self
    }
}

#[async_trait]
impl ScoringStore for MemoryStore {
    async fn scoring_records(&self, filter: &RecordFilter) -> Result<Vec<ScoringRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect())
    }

    async fn registered_users(&self) -> Result<i64> {
        Ok(self.registered_users)
    }
}

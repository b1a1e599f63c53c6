use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::NaiveDate;
use serde::Deserialize;
use storage::dto::leaderboard::{LeaderboardEntry, LeaderboardView};
use tokio::sync::RwLock;

/// Tables whose changes can make a derived view stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntitySet {
    Programs,
    Predictions,
    Profiles,
}

impl EntitySet {
    pub fn from_table(table: &str) -> Option<Self> {
        match table {
            "programs" => Some(Self::Programs),
            "predictions" => Some(Self::Predictions),
            "profiles" => Some(Self::Profiles),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// Payload of a database change notification.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChangeEvent {
    pub table: String,
    pub op: ChangeKind,
}

impl ChangeEvent {
    pub fn entity_set(&self) -> Option<EntitySet> {
        EntitySet::from_table(&self.table)
    }
}

type ViewKey = (LeaderboardView, NaiveDate);

pub const DEFAULT_MAX_VIEWS: usize = 256;

/// Computed leaderboards, kept until a change event touches the data they derive from.
///
/// Every leaderboard reads programs, predictions and profiles, so any change to
/// one of those sets drops all cached views. The generation counter keeps a
/// computation that raced with an invalidation from being stored.
///
/// Only views of the current day are kept, and at most `max_views` of them.
/// Once full, further views are computed on every read until the next invalidation.
#[derive(Debug)]
pub struct LeaderboardCache {
    views: RwLock<HashMap<ViewKey, Arc<Vec<LeaderboardEntry>>>>,
    generation: AtomicU64,
    max_views: usize,
}

impl Default for LeaderboardCache {
    fn default() -> Self {
        Self::with_max_views(DEFAULT_MAX_VIEWS)
    }
}

impl LeaderboardCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_views(max_views: usize) -> Self {
        Self {
            views: RwLock::default(),
            generation: AtomicU64::new(0),
            max_views,
        }
    }

    pub async fn get_or_compute<F, Fut, E>(
        &self,
        view: &LeaderboardView,
        today: NaiveDate,
        compute: F,
    ) -> Result<Arc<Vec<LeaderboardEntry>>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<LeaderboardEntry>, E>>,
    {
        let key = (view.clone(), today);

        if let Some(entries) = self.views.read().await.get(&key) {
            return Ok(Arc::clone(entries));
        }

        let generation = self.generation.load(Ordering::Acquire);
        let entries = Arc::new(compute().await?);

        let mut views = self.views.write().await;
        if self.generation.load(Ordering::Acquire) == generation {
            views.retain(|(_, date), _| *date == today);
            if views.len() < self.max_views {
                views.insert(key, Arc::clone(&entries));
            }
        }

        Ok(entries)
    }

    pub async fn invalidate_all(&self) {
        let mut views = self.views.write().await;
        self.generation.fetch_add(1, Ordering::AcqRel);
        views.clear();
    }

    /// Applies a change event. Returns whether cached views were dropped.
    pub async fn handle(&self, event: &ChangeEvent) -> bool {
        match event.entity_set() {
            Some(_) => {
                self.invalidate_all().await;
                true
            }
            None => false,
        }
    }

    pub async fn len(&self) -> usize {
        self.views.read().await.len()
    }
}

use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgListener;

use crate::cache::{ChangeEvent, LeaderboardCache};

/// Channel the database triggers publish change events on.
pub const CHANGES_CHANNEL: &str = "audience_changes";

const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Keeps the leaderboard cache in step with database changes, reconnecting on failure.
pub async fn run(pool: PgPool, cache: Arc<LeaderboardCache>) {
    loop {
        match listen(&pool, &cache).await {
            Ok(()) => tracing::warn!("Change listener lost its connection"),
            Err(e) => tracing::warn!("Change listener disconnected: {}", e),
        }

        cache.invalidate_all().await;
        tokio::time::sleep(RECONNECT_DELAY).await;
    }
}

async fn listen(pool: &PgPool, cache: &LeaderboardCache) -> Result<(), sqlx::Error> {
    let mut listener = PgListener::connect_with(pool).await?;
    listener.listen(CHANGES_CHANNEL).await?;
    tracing::info!("Listening for changes on channel {}", CHANGES_CHANNEL);

    // Views computed before LISTEN took effect may predate changes nobody was told about.
    cache.invalidate_all().await;

    loop {
        // `None` means the connection dropped. Reconnect from `run` so the
        // re-LISTEN above invalidates again once it is in place.
        let notification = listener.try_recv().await?;
        let payload = notification.as_ref().map(|n| n.payload());
        apply(cache, payload).await;

        if payload.is_none() {
            return Ok(());
        }
    }
}

/// Applies one receive result to the cache. Returns whether cached views were dropped.
async fn apply(cache: &LeaderboardCache, payload: Option<&str>) -> bool {
    let Some(payload) = payload else {
        // Notifications sent while disconnected are lost.
        cache.invalidate_all().await;
        return true;
    };

    match serde_json::from_str::<ChangeEvent>(payload) {
        Ok(event) => {
            let invalidated = cache.handle(&event).await;
            if invalidated {
                tracing::debug!(table = %event.table, op = ?event.op, "Leaderboard cache invalidated");
            }
            invalidated
        }
        Err(e) => {
            tracing::warn!("Ignoring malformed change payload {:?}: {}", payload, e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use storage::dto::leaderboard::LeaderboardView;

    async fn warm_cache() -> LeaderboardCache {
        let cache = LeaderboardCache::new();
        let today = NaiveDate::from_ymd_opt(2025, 3, 12).unwrap();
        cache
            .get_or_compute(&LeaderboardView::default(), today, || async {
                Ok::<_, ()>(Vec::new())
            })
            .await
            .unwrap();
        cache
    }

    #[tokio::test]
    async fn test_lost_connection_drops_views() {
        let cache = warm_cache().await;

        assert!(apply(&cache, None).await);
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn test_change_payload_drops_views() {
        let cache = warm_cache().await;

        assert!(apply(&cache, Some(r#"{"table": "predictions", "op": "INSERT"}"#)).await);
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn test_malformed_payload_keeps_views() {
        let cache = warm_cache().await;

        assert!(!apply(&cache, Some("not json")).await);
        assert_eq!(cache.len().await, 1);
    }
}

//! Dashboard statistics with a short-lived in-process cache.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::Utc;
use moka::future::Cache;
use sqlx::PgPool;
use tracing::{debug, instrument};

use crate::db::{RepositoryError, StatsRepository};
use crate::models::DashboardStats;
use crate::models::stats::{REGISTRATION_MONTHS, fill_monthly_series};

/// How long computed statistics are served from memory.
pub const STATS_TTL: Duration = Duration::from_secs(30);

/// Caches the single dashboard snapshot.
///
/// Writes to startups, events, announcements or schedules call
/// [`StatsCache::invalidate`] so the next read recomputes. Each invalidation
/// bumps a generation counter; a snapshot computed under an older
/// generation is never left in the cache.
#[derive(Clone)]
pub struct StatsCache {
    cache: Cache<(), Arc<DashboardStats>>,
    generation: Arc<AtomicU64>,
}

impl Default for StatsCache {
    fn default() -> Self {
        Self::new(STATS_TTL)
    }
}

impl StatsCache {
    /// Create a cache whose entry lives for `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Cache::builder().max_capacity(1).time_to_live(ttl).build(),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Return cached statistics, computing them on a miss.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if any aggregate query fails.
    pub async fn get_or_compute(&self, pool: &PgPool) -> Result<Arc<DashboardStats>, RepositoryError> {
        if let Some(stats) = self.cache.get(&()).await {
            debug!("dashboard stats cache hit");
            return Ok(stats);
        }

        let seen = self.generation.load(Ordering::Acquire);
        let stats = Arc::new(compute(pool).await?);
        self.store(seen, Arc::clone(&stats)).await;
        Ok(stats)
    }

    /// Cache `stats` computed while the generation was `seen`.
    ///
    /// If an invalidation happened in the meantime the entry is dropped
    /// again, so the next read recomputes.
    async fn store(&self, seen: u64, stats: Arc<DashboardStats>) {
        self.cache.insert((), stats).await;
        if self.generation.load(Ordering::Acquire) != seen {
            debug!("dashboard stats went stale while computing");
            self.cache.invalidate(&()).await;
        }
    }

    /// Drop the cached snapshot.
    pub async fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.cache.invalidate(&()).await;
    }
}

/// Run every aggregate query and assemble the dashboard payload.
///
/// # Errors
///
/// Returns `RepositoryError` if any aggregate query fails.
#[instrument(skip(pool))]
pub async fn compute(pool: &PgPool) -> Result<DashboardStats, RepositoryError> {
    let repo = StatsRepository::new(pool);

    let (startups, startups_by_sector, monthly, events, announcements, upcoming_meetings) = tokio::try_join!(
        repo.startup_counts(),
        repo.startups_by_sector(),
        repo.monthly_registrations(REGISTRATION_MONTHS),
        repo.event_counts(),
        repo.announcement_count(),
        repo.upcoming_schedule_count(),
    )?;

    let now = Utc::now();

    Ok(DashboardStats {
        startups,
        startups_by_sector,
        monthly_registrations: fill_monthly_series(&monthly, now.date_naive(), REGISTRATION_MONTHS),
        events,
        announcements,
        upcoming_meetings,
        generated_at: now,
    })
}

#[cfg(test)]
mod tests {
    use crate::models::stats::{EventCounts, StartupCounts};

    use super::*;

    fn sample() -> DashboardStats {
        DashboardStats {
            startups: StartupCounts::default(),
            startups_by_sector: Vec::new(),
            monthly_registrations: Vec::new(),
            events: EventCounts::default(),
            announcements: 4,
            upcoming_meetings: 0,
            generated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_invalidate_clears_snapshot() {
        let stats = StatsCache::default();
        stats.cache.insert((), Arc::new(sample())).await;
        assert!(stats.cache.get(&()).await.is_some());

        stats.invalidate().await;
        assert!(stats.cache.get(&()).await.is_none());
    }

    #[tokio::test]
    async fn test_snapshot_from_before_invalidate_is_discarded() {
        let stats = StatsCache::default();
        let seen = stats.generation.load(Ordering::Acquire);

        // A write lands while the snapshot is being computed.
        stats.invalidate().await;
        stats.store(seen, Arc::new(sample())).await;
        assert!(stats.cache.get(&()).await.is_none());

        let seen = stats.generation.load(Ordering::Acquire);
        stats.store(seen, Arc::new(sample())).await;
        assert!(stats.cache.get(&()).await.is_some());
    }

    #[tokio::test]
    async fn test_clones_share_generation() {
        let stats = StatsCache::default();
        let handle = stats.clone();
        let seen = stats.generation.load(Ordering::Acquire);

        handle.invalidate().await;
        stats.store(seen, Arc::new(sample())).await;
        assert!(stats.cache.get(&()).await.is_none());
    }

    #[tokio::test]
    async fn test_hit_does_not_touch_database() {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost:1/unreachable")
            .expect("lazy pool");
        let stats = StatsCache::default();
        stats.cache.insert((), Arc::new(sample())).await;

        let cached = stats.get_or_compute(&pool).await.expect("cache hit");
        assert_eq!(cached.announcements, 4);
    }
}

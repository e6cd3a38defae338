//! Aggregate queries behind the admin dashboard.

use sqlx::PgPool;

use super::RepositoryError;
use crate::models::stats::{EventCounts, MonthlyCount, SectorCount, StartupCounts, UNSPECIFIED_SECTOR};

/// Read-only repository for dashboard statistics.
pub struct StatsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StatsRepository<'a> {
    /// Create a new stats repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Count startups in total and per review status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn startup_counts(&self) -> Result<StartupCounts, RepositoryError> {
        let counts = sqlx::query_as::<_, StartupCounts>(
            r"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status = 'pending') AS pending,
                COUNT(*) FILTER (WHERE status = 'approved') AS approved,
                COUNT(*) FILTER (WHERE status = 'rejected') AS rejected
            FROM incubator.startup
            ",
        )
        .fetch_one(self.pool)
        .await?;

        Ok(counts)
    }

    /// Count startups per sector, largest first.
    ///
    /// Blank or missing sectors are grouped under [`UNSPECIFIED_SECTOR`].
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn startups_by_sector(&self) -> Result<Vec<SectorCount>, RepositoryError> {
        let rows = sqlx::query_as::<_, SectorCount>(
            r"
            SELECT COALESCE(NULLIF(btrim(sector), ''), $1) AS sector, COUNT(*) AS count
            FROM incubator.startup
            GROUP BY 1
            ORDER BY count DESC, sector
            ",
        )
        .bind(UNSPECIFIED_SECTOR)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Count registrations per month over the last `months` calendar months,
    /// including the current one. Months without registrations are absent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn monthly_registrations(
        &self,
        months: u32,
    ) -> Result<Vec<MonthlyCount>, RepositoryError> {
        let back = i32::try_from(months.saturating_sub(1)).unwrap_or(i32::MAX);

        let rows = sqlx::query_as::<_, MonthlyCount>(
            r"
            SELECT to_char(date_trunc('month', created_at), 'YYYY-MM') AS month,
                   COUNT(*) AS count
            FROM incubator.startup
            WHERE created_at >= date_trunc('month', now()) - make_interval(months => $1)
            GROUP BY 1
            ORDER BY 1
            ",
        )
        .bind(back)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Count events in total and those that have not started yet.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn event_counts(&self) -> Result<EventCounts, RepositoryError> {
        let counts = sqlx::query_as::<_, EventCounts>(
            r"
            SELECT COUNT(*) AS total,
                   COUNT(*) FILTER (WHERE starts_at >= now()) AS upcoming
            FROM incubator.event
            ",
        )
        .fetch_one(self.pool)
        .await?;

        Ok(counts)
    }

    /// Count all announcements.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn announcement_count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM incubator.announcement")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }

    /// Count meetings scheduled for today or later.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn upcoming_schedule_count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM incubator.schedule WHERE meeting_date >= CURRENT_DATE",
        )
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }
}

//! Meeting schedule repository.
//!
//! Every read joins the owning startup so responses carry its name.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::PgPool;

use incubator_core::{AdminId, ScheduleId, StartupId};

use super::RepositoryError;
use crate::models::{Schedule, ScheduleInput};

const SCHEDULE_SELECT: &str = r"
    SELECT s.id, s.startup_id, st.name AS startup_name, s.meeting_date, s.meeting_time,
           s.description, s.created_by, s.created_at, s.updated_at
";

const UNKNOWN_STARTUP: &str = "startup does not exist";
const UNKNOWN_CREATOR: &str = "creating admin account no longer exists";

/// Default Postgres name of the `schedule.created_by` foreign key.
const CREATED_BY_FKEY: &str = "schedule_created_by_fkey";

/// Classify a schedule write error, telling the two foreign keys apart.
fn write_error(err: sqlx::Error) -> RepositoryError {
    let reference = match &err {
        sqlx::Error::Database(db_err) => reference_message(db_err.constraint()),
        _ => UNKNOWN_STARTUP,
    };
    RepositoryError::from_write(err, "duplicate schedule", reference)
}

fn reference_message(constraint: Option<&str>) -> &'static str {
    if constraint == Some(CREATED_BY_FKEY) {
        UNKNOWN_CREATOR
    } else {
        UNKNOWN_STARTUP
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ScheduleRow {
    id: i32,
    startup_id: i32,
    startup_name: String,
    meeting_date: NaiveDate,
    meeting_time: NaiveTime,
    description: String,
    created_by: Option<i32>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ScheduleRow> for Schedule {
    fn from(row: ScheduleRow) -> Self {
        Self {
            id: ScheduleId::new(row.id),
            startup_id: StartupId::new(row.startup_id),
            startup_name: row.startup_name,
            meeting_date: row.meeting_date,
            meeting_time: row.meeting_time,
            description: row.description,
            created_by: row.created_by.map(AdminId::new),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for schedule database operations.
pub struct ScheduleRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ScheduleRepository<'a> {
    /// Create a new schedule repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new meeting.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InvalidReference` if the startup doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        input: &ScheduleInput,
        created_by: AdminId,
    ) -> Result<Schedule, RepositoryError> {
        let row = sqlx::query_as::<_, ScheduleRow>(&format!(
            r"
            WITH s AS (
                INSERT INTO incubator.schedule
                    (startup_id, meeting_date, meeting_time, description, created_by)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING *
            )
            {SCHEDULE_SELECT}
            FROM s
            JOIN incubator.startup st ON st.id = s.startup_id
            "
        ))
        .bind(input.startup_id)
        .bind(input.meeting_date)
        .bind(input.meeting_time)
        .bind(&input.description)
        .bind(created_by)
        .fetch_one(self.pool)
        .await
        .map_err(write_error)?;

        Ok(row.into())
    }

    /// Get a meeting by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ScheduleId) -> Result<Option<Schedule>, RepositoryError> {
        let row = sqlx::query_as::<_, ScheduleRow>(&format!(
            r"
            {SCHEDULE_SELECT}
            FROM incubator.schedule s
            JOIN incubator.startup st ON st.id = s.startup_id
            WHERE s.id = $1
            "
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// List meetings in chronological order, optionally for one startup only.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, startup_id: Option<StartupId>) -> Result<Vec<Schedule>, RepositoryError> {
        let rows = sqlx::query_as::<_, ScheduleRow>(&format!(
            r"
            {SCHEDULE_SELECT}
            FROM incubator.schedule s
            JOIN incubator.startup st ON st.id = s.startup_id
            WHERE $1::integer IS NULL OR s.startup_id = $1
            ORDER BY s.meeting_date, s.meeting_time, s.id
            "
        ))
        .bind(startup_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Replace a meeting's fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the meeting doesn't exist.
    /// Returns `RepositoryError::InvalidReference` if the new startup doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ScheduleId,
        input: &ScheduleInput,
    ) -> Result<Schedule, RepositoryError> {
        let row = sqlx::query_as::<_, ScheduleRow>(&format!(
            r"
            WITH s AS (
                UPDATE incubator.schedule
                SET startup_id = $2, meeting_date = $3, meeting_time = $4,
                    description = $5, updated_at = now()
                WHERE id = $1
                RETURNING *
            )
            {SCHEDULE_SELECT}
            FROM s
            JOIN incubator.startup st ON st.id = s.startup_id
            "
        ))
        .bind(id)
        .bind(input.startup_id)
        .bind(input.meeting_date)
        .bind(input.meeting_time)
        .bind(&input.description)
        .fetch_optional(self.pool)
        .await
        .map_err(write_error)?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Delete a meeting.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the meeting doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: ScheduleId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM incubator.schedule WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_message_names_the_broken_key() {
        assert_eq!(reference_message(Some(CREATED_BY_FKEY)), UNKNOWN_CREATOR);
        assert_eq!(
            reference_message(Some("schedule_startup_id_fkey")),
            UNKNOWN_STARTUP
        );
        assert_eq!(reference_message(None), UNKNOWN_STARTUP);
    }

    #[test]
    fn test_non_database_errors_pass_through() {
        assert!(matches!(
            write_error(sqlx::Error::RowNotFound),
            RepositoryError::Database(sqlx::Error::RowNotFound)
        ));
    }
}

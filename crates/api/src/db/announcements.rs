//! Announcement repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use incubator_core::{AdminId, AnnouncementId};

use super::RepositoryError;
use crate::models::{Announcement, AnnouncementInput};

const ANNOUNCEMENT_COLUMNS: &str = "id, title, content, created_by, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct AnnouncementRow {
    id: i32,
    title: String,
    content: String,
    created_by: Option<i32>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<AnnouncementRow> for Announcement {
    fn from(row: AnnouncementRow) -> Self {
        Self {
            id: AnnouncementId::new(row.id),
            title: row.title,
            content: row.content,
            created_by: row.created_by.map(AdminId::new),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for announcement database operations.
pub struct AnnouncementRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AnnouncementRepository<'a> {
    /// Create a new announcement repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new announcement.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        input: &AnnouncementInput,
        created_by: AdminId,
    ) -> Result<Announcement, RepositoryError> {
        let row = sqlx::query_as::<_, AnnouncementRow>(&format!(
            r"
            INSERT INTO incubator.announcement (title, content, created_by)
            VALUES ($1, $2, $3)
            RETURNING {ANNOUNCEMENT_COLUMNS}
            "
        ))
        .bind(&input.title)
        .bind(&input.content)
        .bind(created_by)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, "duplicate announcement", "unknown admin"))?;

        Ok(row.into())
    }

    /// Get an announcement by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(
        &self,
        id: AnnouncementId,
    ) -> Result<Option<Announcement>, RepositoryError> {
        let row = sqlx::query_as::<_, AnnouncementRow>(&format!(
            "SELECT {ANNOUNCEMENT_COLUMNS} FROM incubator.announcement WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// List announcements, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Announcement>, RepositoryError> {
        let rows = sqlx::query_as::<_, AnnouncementRow>(&format!(
            "SELECT {ANNOUNCEMENT_COLUMNS} FROM incubator.announcement \
             ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Replace an announcement's title and content.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the announcement doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: AnnouncementId,
        input: &AnnouncementInput,
    ) -> Result<Announcement, RepositoryError> {
        let row = sqlx::query_as::<_, AnnouncementRow>(&format!(
            r"
            UPDATE incubator.announcement
            SET title = $2, content = $3, updated_at = now()
            WHERE id = $1
            RETURNING {ANNOUNCEMENT_COLUMNS}
            "
        ))
        .bind(id)
        .bind(&input.title)
        .bind(&input.content)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Delete an announcement.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the announcement doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: AnnouncementId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM incubator.announcement WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

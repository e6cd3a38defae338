//! Startup repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use incubator_core::{Email, StartupId, StartupStatus};

use super::RepositoryError;
use crate::models::{NewStartup, Startup, StartupFilter, StartupProfile};

const STARTUP_COLUMNS: &str = "id, name, founder_name, email, phone, sector, stage, \
                               description, website, status, created_at, updated_at";

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct StartupRow {
    id: i32,
    name: String,
    founder_name: String,
    email: String,
    phone: Option<String>,
    sector: Option<String>,
    stage: Option<String>,
    description: Option<String>,
    website: Option<String>,
    status: StartupStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<StartupRow> for Startup {
    type Error = RepositoryError;

    fn try_from(row: StartupRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: StartupId::new(row.id),
            name: row.name,
            founder_name: row.founder_name,
            email,
            phone: row.phone,
            sector: row.sector,
            stage: row.stage,
            description: row.description,
            website: row.website,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct StartupCredentialsRow {
    #[sqlx(flatten)]
    startup: StartupRow,
    password_hash: String,
}

/// Escape `LIKE` wildcards so user input only matches literally.
fn like_pattern(search: &str) -> String {
    let mut escaped = String::with_capacity(search.len() + 2);
    escaped.push('%');
    for c in search.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for startup database operations.
pub struct StartupRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StartupRepository<'a> {
    /// Create a new startup repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new startup application. The status starts as `pending`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new: &NewStartup) -> Result<Startup, RepositoryError> {
        let profile = &new.profile;
        let row = sqlx::query_as::<_, StartupRow>(&format!(
            r"
            INSERT INTO incubator.startup
                (name, founder_name, email, password_hash, phone, sector, stage, description, website)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {STARTUP_COLUMNS}
            "
        ))
        .bind(&profile.name)
        .bind(&profile.founder_name)
        .bind(new.email.as_str())
        .bind(&new.password_hash)
        .bind(&profile.phone)
        .bind(&profile.sector)
        .bind(&profile.stage)
        .bind(&profile.description)
        .bind(&profile.website)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, "email already exists", "invalid reference"))?;

        row.try_into()
    }

    /// Get a startup by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get_by_id(&self, id: StartupId) -> Result<Option<Startup>, RepositoryError> {
        let row = sqlx::query_as::<_, StartupRow>(&format!(
            "SELECT {STARTUP_COLUMNS} FROM incubator.startup WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Get a startup together with its password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get_credentials_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<(Startup, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, StartupCredentialsRow>(&format!(
            "SELECT {STARTUP_COLUMNS}, password_hash FROM incubator.startup WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some((row.startup.try_into()?, row.password_hash)))
    }

    /// List startups matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn list(&self, filter: &StartupFilter) -> Result<Vec<Startup>, RepositoryError> {
        let pattern = filter.search.as_deref().map(like_pattern);

        let rows = sqlx::query_as::<_, StartupRow>(&format!(
            r"
            SELECT {STARTUP_COLUMNS}
            FROM incubator.startup
            WHERE ($1::incubator.startup_status IS NULL OR status = $1)
              AND ($2::text IS NULL
                   OR name ILIKE $2
                   OR founder_name ILIKE $2
                   OR email ILIKE $2)
            ORDER BY created_at DESC, id DESC
            "
        ))
        .bind(filter.status)
        .bind(pattern)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Replace a startup's editable profile fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the startup doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_profile(
        &self,
        id: StartupId,
        profile: &StartupProfile,
    ) -> Result<Startup, RepositoryError> {
        let row = sqlx::query_as::<_, StartupRow>(&format!(
            r"
            UPDATE incubator.startup
            SET name = $2, founder_name = $3, phone = $4, sector = $5, stage = $6,
                description = $7, website = $8, updated_at = now()
            WHERE id = $1
            RETURNING {STARTUP_COLUMNS}
            "
        ))
        .bind(id)
        .bind(&profile.name)
        .bind(&profile.founder_name)
        .bind(&profile.phone)
        .bind(&profile.sector)
        .bind(&profile.stage)
        .bind(&profile.description)
        .bind(&profile.website)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    /// Set the review status of a startup.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the startup doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_status(
        &self,
        id: StartupId,
        status: StartupStatus,
    ) -> Result<Startup, RepositoryError> {
        let row = sqlx::query_as::<_, StartupRow>(&format!(
            r"
            UPDATE incubator.startup
            SET status = $2, updated_at = now()
            WHERE id = $1
            RETURNING {STARTUP_COLUMNS}
            "
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    /// Delete a startup and, by cascade, its schedules.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the startup doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: StartupId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM incubator.startup WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

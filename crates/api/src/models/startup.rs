//! Startup domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use incubator_core::{Email, StartupId, StartupStatus};

/// A startup application (and, once approved, a startup account).
#[derive(Debug, Clone, Serialize)]
pub struct Startup {
    /// Unique startup ID.
    pub id: StartupId,
    /// Company name.
    pub name: String,
    /// Name of the founder who registered.
    pub founder_name: String,
    /// Login email.
    pub email: Email,
    pub phone: Option<String>,
    /// Industry sector (e.g. "Fintech").
    pub sector: Option<String>,
    /// Company stage (e.g. "Idea", "MVP", "Seed").
    pub stage: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    /// Review status.
    pub status: StartupStatus,
    /// When the application was submitted.
    pub created_at: DateTime<Utc>,
    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Editable profile fields of a startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupProfile {
    pub name: String,
    pub founder_name: String,
    pub phone: Option<String>,
    pub sector: Option<String>,
    pub stage: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
}

/// Data required to insert a startup.
#[derive(Debug, Clone)]
pub struct NewStartup {
    pub email: Email,
    /// Argon2 PHC string.
    pub password_hash: String,
    pub profile: StartupProfile,
}

/// Filter for listing startups.
#[derive(Debug, Clone, Default)]
pub struct StartupFilter {
    /// Only startups in this status.
    pub status: Option<StartupStatus>,
    /// Case-insensitive substring match on name, founder or email.
    pub search: Option<String>,
}

//! Admin account domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use incubator_core::{AdminId, AdminRole, Email};

/// An incubator staff account.
#[derive(Debug, Clone, Serialize)]
pub struct Admin {
    /// Unique admin ID.
    pub id: AdminId,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: Email,
    /// Permission level.
    pub role: AdminRole,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to insert an admin.
#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub name: String,
    pub email: Email,
    /// Argon2 PHC string.
    pub password_hash: String,
    pub role: AdminRole,
}

//! Announcement domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use incubator_core::{AdminId, AnnouncementId};

/// An announcement published by the incubator staff.
#[derive(Debug, Clone, Serialize)]
pub struct Announcement {
    pub id: AnnouncementId,
    pub title: String,
    pub content: String,
    pub created_by: Option<AdminId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated fields for creating or replacing an announcement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnouncementInput {
    pub title: String,
    pub content: String,
}

//! Event domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use incubator_core::{AdminId, EventId};

/// An incubator event (demo day, workshop, mixer, ...).
#[derive(Debug, Clone, Serialize)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub description: String,
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub registration_link: Option<String>,
    /// Admin who created the event (None once that admin is deleted).
    pub created_by: Option<AdminId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated fields for creating or replacing an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventInput {
    pub title: String,
    pub description: String,
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub registration_link: Option<String>,
}

//! Meeting schedule domain types.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

use incubator_core::{AdminId, ScheduleId, StartupId};

/// A meeting between the incubator and one startup.
#[derive(Debug, Clone, Serialize)]
pub struct Schedule {
    pub id: ScheduleId,
    pub startup_id: StartupId,
    /// Name of the startup, joined for display.
    pub startup_name: String,
    pub meeting_date: NaiveDate,
    pub meeting_time: NaiveTime,
    pub description: String,
    pub created_by: Option<AdminId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated fields for creating or replacing a schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleInput {
    pub startup_id: StartupId,
    pub meeting_date: NaiveDate,
    pub meeting_time: NaiveTime,
    pub description: String,
}

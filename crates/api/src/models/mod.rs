//! Domain models for the incubator API.
//!
//! These types represent validated domain objects separate from database
//! row types. Row types live next to the queries in [`crate::db`].

pub mod account;
pub mod admin;
pub mod announcement;
pub mod event;
pub mod schedule;
pub mod startup;
pub mod stats;

pub use account::{CurrentAccount, CurrentAdmin, CurrentStartup};
pub use admin::{Admin, NewAdmin};
pub use announcement::{Announcement, AnnouncementInput};
pub use event::{Event, EventInput};
pub use schedule::{Schedule, ScheduleInput};
pub use startup::{NewStartup, Startup, StartupFilter, StartupProfile};
pub use stats::DashboardStats;

pub use incubator_core::{AccountKind, AdminRole, StartupStatus};

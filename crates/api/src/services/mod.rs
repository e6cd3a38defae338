//! Business logic services.

pub mod auth;
pub mod dashboard;
pub mod minutes;

pub use auth::AuthService;
pub use dashboard::StatsCache;
pub use minutes::MinutesClient;

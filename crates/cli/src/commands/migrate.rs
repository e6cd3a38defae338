//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! incubator-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `INCUBATOR_DATABASE_URL` - `PostgreSQL` connection string
//!
//! Migrations are embedded from `crates/api/migrations/`.

use incubator_api::db;

/// Apply all pending migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;

    tracing::info!("Running migrations...");
    db::run_migrations(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}

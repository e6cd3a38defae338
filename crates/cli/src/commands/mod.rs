//! CLI subcommands.

pub mod admin;
pub mod migrate;
pub mod seed;

use secrecy::SecretString;
use sqlx::PgPool;

/// Environment variable holding the database connection string.
pub const DATABASE_URL_VAR: &str = "INCUBATOR_DATABASE_URL";

/// Generic fallback, read when [`DATABASE_URL_VAR`] is unset.
pub const FALLBACK_DATABASE_URL_VAR: &str = "DATABASE_URL";

/// Load `.env` and read the database URL.
///
/// # Errors
///
/// Returns the variable name if neither variable is set.
pub fn database_url() -> Result<SecretString, &'static str> {
    dotenvy::dotenv().ok();

    resolve_database_url(|key| std::env::var(key).ok())
        .map(SecretString::from)
        .ok_or(DATABASE_URL_VAR)
}

/// Pick the first non-blank URL, preferring [`DATABASE_URL_VAR`].
fn resolve_database_url(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    [DATABASE_URL_VAR, FALLBACK_DATABASE_URL_VAR]
        .into_iter()
        .filter_map(lookup)
        .find(|url| !url.trim().is_empty())
}

/// Connect to the database named by [`database_url`].
///
/// # Errors
///
/// Returns an error if the variable is missing or the connection fails.
pub async fn connect() -> Result<PgPool, Box<dyn std::error::Error>> {
    let url = database_url().map_err(|var| format!("{var} not set"))?;
    tracing::info!("Connecting to database...");
    Ok(incubator_api::db::create_pool(&url).await?)
}

//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ApiConfig;
use crate::services::auth::TokenService;
use crate::services::minutes::{MinutesClient, MinutesError};
use crate::services::StatsCache;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    pool: PgPool,
    tokens: TokenService,
    stats: StatsCache,
    minutes: Option<MinutesClient>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - API configuration
    /// * `pool` - `PostgreSQL` connection pool
    ///
    /// # Errors
    ///
    /// Returns an error if the Gemini client cannot be built from the configuration.
    pub fn new(config: ApiConfig, pool: PgPool) -> Result<Self, MinutesError> {
        let tokens = TokenService::new(&config.jwt.secret, config.jwt.ttl_hours);
        let minutes = config.gemini.as_ref().map(MinutesClient::new).transpose()?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                tokens,
                stats: StatsCache::default(),
                minutes,
            }),
        })
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the token service.
    #[must_use]
    pub fn tokens(&self) -> &TokenService {
        &self.inner.tokens
    }

    /// Get a reference to the dashboard statistics cache.
    #[must_use]
    pub fn stats(&self) -> &StatsCache {
        &self.inner.stats
    }

    /// Get the minutes client, if a Gemini API key is configured.
    #[must_use]
    pub fn minutes(&self) -> Option<&MinutesClient> {
        self.inner.minutes.as_ref()
    }
}

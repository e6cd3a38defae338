//! Startup profile and approval routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, patch},
};
use serde::Deserialize;
use tracing::{info, instrument};

use incubator_core::{StartupId, StartupStatus};

use super::extract::{ApiJson, ApiPath, ApiQuery};
use super::{missing, not_found_as};
use super::validation::{self, MAX_LONG_TEXT, MAX_SHORT_TEXT, ValidationError};
use crate::db::{ScheduleRepository, StartupRepository};
use crate::error::Result;
use crate::middleware::{RequireAdmin, RequireStartup};
use crate::models::{Schedule, Startup, StartupFilter, StartupProfile};
use crate::state::AppState;

/// Build the startup router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/startups", get(list))
        .route("/api/startups/me", get(me).put(update_me))
        .route("/api/startups/me/schedules", get(my_schedules))
        .route("/api/startups/{id}", get(show).put(update).delete(destroy))
        .route("/api/startups/{id}/status", patch(set_status))
}

// =============================================================================
// Request Types
// =============================================================================

/// Editable profile fields as submitted by clients.
#[derive(Debug, Default, Deserialize)]
pub struct ProfileRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub founder_name: String,
    pub phone: Option<String>,
    pub sector: Option<String>,
    pub stage: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
}

impl ProfileRequest {
    /// Validate and normalise into a [`StartupProfile`].
    pub fn validate(&self) -> std::result::Result<StartupProfile, ValidationError> {
        Ok(StartupProfile {
            name: validation::required_text("name", &self.name, MAX_SHORT_TEXT)?,
            founder_name: validation::required_text("founder_name", &self.founder_name, MAX_SHORT_TEXT)?,
            phone: validation::optional_text("phone", self.phone.as_deref(), 32)?,
            sector: validation::optional_text("sector", self.sector.as_deref(), 100)?,
            stage: validation::optional_text("stage", self.stage.as_deref(), 100)?,
            description: validation::optional_text(
                "description",
                self.description.as_deref(),
                MAX_LONG_TEXT,
            )?,
            website: validation::optional_url("website", self.website.as_deref())?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<StartupStatus>,
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: StartupStatus,
}

// =============================================================================
// Startup Self-Service
// =============================================================================

async fn me(RequireStartup(current): RequireStartup, State(state): State<AppState>) -> Result<Json<Startup>> {
    let startup = StartupRepository::new(state.pool())
        .get_by_id(current.id)
        .await?
        .ok_or_else(|| missing("Startup"))?;

    Ok(Json(startup))
}

#[instrument(skip(state, body), fields(startup_id = %current.id))]
async fn update_me(
    RequireStartup(current): RequireStartup,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ProfileRequest>,
) -> Result<Json<Startup>> {
    let profile = body.validate()?;

    let startup = StartupRepository::new(state.pool())
        .update_profile(current.id, &profile)
        .await?;

    state.stats().invalidate().await;

    Ok(Json(startup))
}

async fn my_schedules(
    RequireStartup(current): RequireStartup,
    State(state): State<AppState>,
) -> Result<Json<Vec<Schedule>>> {
    let schedules = ScheduleRepository::new(state.pool())
        .list(Some(current.id))
        .await?;

    Ok(Json(schedules))
}

// =============================================================================
// Admin Management
// =============================================================================

async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<Vec<Startup>>> {
    let filter = StartupFilter {
        status: query.status,
        search: validation::optional_text("q", query.q.as_deref(), MAX_SHORT_TEXT)?,
    };

    let startups = StartupRepository::new(state.pool()).list(&filter).await?;

    Ok(Json(startups))
}

async fn show(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<StartupId>,
) -> Result<Json<Startup>> {
    let startup = StartupRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .ok_or_else(|| missing("Startup"))?;

    Ok(Json(startup))
}

#[instrument(skip(state, body), fields(admin_id = %admin.id))]
async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<StartupId>,
    ApiJson(body): ApiJson<ProfileRequest>,
) -> Result<Json<Startup>> {
    let profile = body.validate()?;

    let startup = StartupRepository::new(state.pool())
        .update_profile(id, &profile)
        .await
        .map_err(not_found_as("Startup"))?;

    state.stats().invalidate().await;

    Ok(Json(startup))
}

#[instrument(skip(state, body), fields(admin_id = %admin.id))]
async fn set_status(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<StartupId>,
    ApiJson(body): ApiJson<StatusRequest>,
) -> Result<Json<Startup>> {
    let startup = StartupRepository::new(state.pool())
        .set_status(id, body.status)
        .await
        .map_err(not_found_as("Startup"))?;

    state.stats().invalidate().await;
    info!(startup_id = %id, status = %startup.status, "startup status changed");

    Ok(Json(startup))
}

#[instrument(skip(state), fields(admin_id = %admin.id))]
async fn destroy(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<StartupId>,
) -> Result<StatusCode> {
    StartupRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(not_found_as("Startup"))?;

    state.stats().invalidate().await;
    info!(startup_id = %id, "startup deleted");

    Ok(StatusCode::NO_CONTENT)
}

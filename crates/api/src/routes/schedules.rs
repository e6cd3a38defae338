//! Meeting schedule routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;
use tracing::{info, instrument};

use incubator_core::{ScheduleId, StartupId};

use super::extract::{ApiJson, ApiPath, ApiQuery};
use super::validation::{self, MAX_LONG_TEXT, ValidationError};
use super::{missing, not_found_as};
use crate::db::ScheduleRepository;
use crate::error::{AppError, Result};
use crate::middleware::{RequireAccount, RequireAdmin};
use crate::models::{CurrentAccount, Schedule, ScheduleInput};
use crate::state::AppState;

/// Build the schedule router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/schedules", get(list).post(create))
        .route("/api/schedules/{id}", get(show).put(update).delete(destroy))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub startup_id: Option<StartupId>,
}

/// Meeting fields as submitted by clients.
///
/// Date and time arrive as strings so that malformed values are reported
/// against their field.
#[derive(Debug, Deserialize)]
pub struct ScheduleRequest {
    pub startup_id: StartupId,
    #[serde(default)]
    pub meeting_date: String,
    #[serde(default)]
    pub meeting_time: String,
    #[serde(default)]
    pub description: String,
}

impl ScheduleRequest {
    fn validate(&self) -> std::result::Result<ScheduleInput, ValidationError> {
        Ok(ScheduleInput {
            startup_id: self.startup_id,
            meeting_date: validation::date("meeting_date", &self.meeting_date)?,
            meeting_time: validation::time("meeting_time", &self.meeting_time)?,
            description: validation::required_text("description", &self.description, MAX_LONG_TEXT)?,
        })
    }
}

async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<Vec<Schedule>>> {
    let schedules = ScheduleRepository::new(state.pool())
        .list(query.startup_id)
        .await?;

    Ok(Json(schedules))
}

async fn show(
    RequireAccount(account): RequireAccount,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ScheduleId>,
) -> Result<Json<Schedule>> {
    let schedule = ScheduleRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .ok_or_else(|| missing("Schedule"))?;

    if let CurrentAccount::Startup(startup) = account
        && startup.id != schedule.startup_id
    {
        return Err(AppError::Forbidden(
            "You can only view your own meetings".to_string(),
        ));
    }

    Ok(Json(schedule))
}

#[instrument(skip(state, body), fields(admin_id = %admin.id))]
async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ScheduleRequest>,
) -> Result<(StatusCode, Json<Schedule>)> {
    let input = body.validate()?;

    let schedule = ScheduleRepository::new(state.pool())
        .create(&input, admin.id)
        .await?;

    state.stats().invalidate().await;
    info!(
        schedule_id = %schedule.id,
        startup_id = %schedule.startup_id,
        "meeting scheduled"
    );

    Ok((StatusCode::CREATED, Json(schedule)))
}

#[instrument(skip(state, body), fields(admin_id = %admin.id))]
async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ScheduleId>,
    ApiJson(body): ApiJson<ScheduleRequest>,
) -> Result<Json<Schedule>> {
    let input = body.validate()?;

    let schedule = ScheduleRepository::new(state.pool())
        .update(id, &input)
        .await
        .map_err(not_found_as("Schedule"))?;

    state.stats().invalidate().await;

    Ok(Json(schedule))
}

#[instrument(skip(state), fields(admin_id = %admin.id))]
async fn destroy(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ScheduleId>,
) -> Result<StatusCode> {
    ScheduleRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(not_found_as("Schedule"))?;

    state.stats().invalidate().await;
    info!(schedule_id = %id, "meeting cancelled");

    Ok(StatusCode::NO_CONTENT)
}

//! Announcement routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;
use tracing::{info, instrument};

use incubator_core::AnnouncementId;

use super::extract::{ApiJson, ApiPath};
use super::validation::{self, MAX_LONG_TEXT, MAX_SHORT_TEXT, ValidationError};
use super::{missing, not_found_as};
use crate::db::AnnouncementRepository;
use crate::error::Result;
use crate::middleware::{RequireAccount, RequireAdmin};
use crate::models::{Announcement, AnnouncementInput};
use crate::state::AppState;

/// Build the announcement router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/announcements", get(list).post(create))
        .route(
            "/api/announcements/{id}",
            get(show).put(update).delete(destroy),
        )
}

#[derive(Debug, Deserialize)]
pub struct AnnouncementRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl AnnouncementRequest {
    fn validate(&self) -> std::result::Result<AnnouncementInput, ValidationError> {
        Ok(AnnouncementInput {
            title: validation::required_text("title", &self.title, MAX_SHORT_TEXT)?,
            content: validation::required_text("content", &self.content, MAX_LONG_TEXT)?,
        })
    }
}

async fn list(
    RequireAccount(_account): RequireAccount,
    State(state): State<AppState>,
) -> Result<Json<Vec<Announcement>>> {
    let announcements = AnnouncementRepository::new(state.pool()).list().await?;
    Ok(Json(announcements))
}

async fn show(
    RequireAccount(_account): RequireAccount,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<AnnouncementId>,
) -> Result<Json<Announcement>> {
    let announcement = AnnouncementRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .ok_or_else(|| missing("Announcement"))?;

    Ok(Json(announcement))
}

#[instrument(skip(state, body), fields(admin_id = %admin.id))]
async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<AnnouncementRequest>,
) -> Result<(StatusCode, Json<Announcement>)> {
    let input = body.validate()?;

    let announcement = AnnouncementRepository::new(state.pool())
        .create(&input, admin.id)
        .await?;

    state.stats().invalidate().await;
    info!(announcement_id = %announcement.id, "announcement published");

    Ok((StatusCode::CREATED, Json(announcement)))
}

#[instrument(skip(state, body), fields(admin_id = %admin.id))]
async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<AnnouncementId>,
    ApiJson(body): ApiJson<AnnouncementRequest>,
) -> Result<Json<Announcement>> {
    let input = body.validate()?;

    let announcement = AnnouncementRepository::new(state.pool())
        .update(id, &input)
        .await
        .map_err(not_found_as("Announcement"))?;

    state.stats().invalidate().await;

    Ok(Json(announcement))
}

#[instrument(skip(state), fields(admin_id = %admin.id))]
async fn destroy(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<AnnouncementId>,
) -> Result<StatusCode> {
    AnnouncementRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(not_found_as("Announcement"))?;

    state.stats().invalidate().await;
    info!(announcement_id = %id, "announcement deleted");

    Ok(StatusCode::NO_CONTENT)
}

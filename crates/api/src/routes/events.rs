//! Event routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{info, instrument};

use incubator_core::EventId;

use super::extract::{ApiJson, ApiPath, ApiQuery};
use super::validation::{self, MAX_LONG_TEXT, MAX_SHORT_TEXT, ValidationError};
use super::{missing, not_found_as};
use crate::db::EventRepository;
use crate::error::Result;
use crate::middleware::{RequireAccount, RequireAdmin};
use crate::models::{Event, EventInput};
use crate::state::AppState;

/// Build the event router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/events", get(list).post(create))
        .route("/api/events/{id}", get(show).put(update).delete(destroy))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub upcoming: bool,
}

#[derive(Debug, Deserialize)]
pub struct EventRequest {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub registration_link: Option<String>,
}

impl EventRequest {
    fn validate(&self) -> std::result::Result<EventInput, ValidationError> {
        validation::time_range(self.starts_at, self.ends_at)?;

        Ok(EventInput {
            title: validation::required_text("title", &self.title, MAX_SHORT_TEXT)?,
            description: validation::optional_text(
                "description",
                self.description.as_deref(),
                MAX_LONG_TEXT,
            )?
            .unwrap_or_default(),
            location: validation::optional_text("location", self.location.as_deref(), MAX_SHORT_TEXT)?,
            starts_at: self.starts_at,
            ends_at: self.ends_at,
            registration_link: validation::optional_url(
                "registration_link",
                self.registration_link.as_deref(),
            )?,
        })
    }
}

async fn list(
    RequireAccount(_account): RequireAccount,
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<Vec<Event>>> {
    let events = EventRepository::new(state.pool()).list(query.upcoming).await?;
    Ok(Json(events))
}

async fn show(
    RequireAccount(_account): RequireAccount,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<EventId>,
) -> Result<Json<Event>> {
    let event = EventRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .ok_or_else(|| missing("Event"))?;

    Ok(Json(event))
}

#[instrument(skip(state, body), fields(admin_id = %admin.id))]
async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<EventRequest>,
) -> Result<(StatusCode, Json<Event>)> {
    let input = body.validate()?;

    let event = EventRepository::new(state.pool())
        .create(&input, admin.id)
        .await?;

    state.stats().invalidate().await;
    info!(event_id = %event.id, "event created");

    Ok((StatusCode::CREATED, Json(event)))
}

#[instrument(skip(state, body), fields(admin_id = %admin.id))]
async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<EventId>,
    ApiJson(body): ApiJson<EventRequest>,
) -> Result<Json<Event>> {
    let input = body.validate()?;

    let event = EventRepository::new(state.pool())
        .update(id, &input)
        .await
        .map_err(not_found_as("Event"))?;

    state.stats().invalidate().await;

    Ok(Json(event))
}

#[instrument(skip(state), fields(admin_id = %admin.id))]
async fn destroy(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<EventId>,
) -> Result<StatusCode> {
    EventRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(not_found_as("Event"))?;

    state.stats().invalidate().await;
    info!(event_id = %id, "event deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn request(json: &str) -> EventRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_valid_event() {
        let input = request(
            r#"{"title": " Demo Day ", "starts_at": "2026-11-01T10:00:00Z",
                "ends_at": "2026-11-01T16:00:00Z", "location": "  "}"#,
        )
        .validate()
        .unwrap();

        assert_eq!(input.title, "Demo Day");
        assert_eq!(input.description, "");
        assert_eq!(input.location, None);
    }

    #[test]
    fn test_end_before_start_is_rejected() {
        let err = request(
            r#"{"title": "Demo Day", "starts_at": "2026-11-01T10:00:00Z",
                "ends_at": "2026-11-01T09:00:00Z"}"#,
        )
        .validate()
        .unwrap_err();

        assert_eq!(err.field, "ends_at");
    }

    #[test]
    fn test_missing_title_is_rejected() {
        let err = request(r#"{"starts_at": "2026-11-01T10:00:00Z"}"#)
            .validate()
            .unwrap_err();
        assert_eq!(err.field, "title");
    }

    #[test]
    fn test_registration_link_must_be_http() {
        let err = request(
            r#"{"title": "Mixer", "starts_at": "2026-11-01T10:00:00Z",
                "registration_link": "javascript:alert(1)"}"#,
        )
        .validate()
        .unwrap_err();
        assert_eq!(err.field, "registration_link");
    }
}

//! Minutes-of-meeting generator route.

use axum::{Json, Router, extract::State, routing::post};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::extract::ApiJson;
use super::validation::{self, MAX_NOTES_TEXT, MAX_SHORT_TEXT, ValidationError};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::services::minutes::MinutesRequest;
use crate::state::AppState;

/// Maximum number of attendees listed in a prompt.
const MAX_ATTENDEES: usize = 100;

/// Build the minutes router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/minutes/summarize", post(summarize))
}

#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    pub title: Option<String>,
    #[serde(default)]
    pub attendees: Vec<String>,
    #[serde(default)]
    pub notes: String,
}

impl SummarizeRequest {
    fn validate(&self) -> std::result::Result<MinutesRequest, ValidationError> {
        if self.attendees.len() > MAX_ATTENDEES {
            return Err(ValidationError::new(
                "attendees",
                format!("at most {MAX_ATTENDEES} attendees are allowed"),
            ));
        }

        let attendees = self
            .attendees
            .iter()
            .map(|name| validation::optional_text("attendees", Some(name.as_str()), MAX_SHORT_TEXT))
            .filter_map(std::result::Result::transpose)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(MinutesRequest {
            title: validation::optional_text("title", self.title.as_deref(), MAX_SHORT_TEXT)?,
            attendees,
            notes: validation::required_text("notes", &self.notes, MAX_NOTES_TEXT)?,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct SummarizeResponse {
    pub minutes: String,
}

#[instrument(skip(state, body), fields(admin_id = %admin.id))]
async fn summarize(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<SummarizeRequest>,
) -> Result<Json<SummarizeResponse>> {
    let request = body.validate()?;

    let client = state.minutes().ok_or_else(|| {
        AppError::ServiceUnavailable("Minutes generation is not configured".to_string())
    })?;

    let minutes = client.summarize(&request).await?;
    info!(chars = minutes.len(), "minutes generated");

    Ok(Json(SummarizeResponse { minutes }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_attendees_are_dropped() {
        let body: SummarizeRequest = serde_json::from_str(
            r#"{"attendees": [" Ana ", "", "Ben"], "notes": "Discussed runway."}"#,
        )
        .unwrap();

        let request = body.validate().unwrap();
        assert_eq!(request.attendees, vec!["Ana", "Ben"]);
        assert_eq!(request.title, None);
    }

    #[test]
    fn test_notes_required() {
        let body: SummarizeRequest = serde_json::from_str(r#"{"title": "Sync"}"#).unwrap();
        assert_eq!(body.validate().unwrap_err().field, "notes");
    }

    #[test]
    fn test_too_many_attendees() {
        let body = SummarizeRequest {
            title: None,
            attendees: vec!["x".to_string(); MAX_ATTENDEES + 1],
            notes: "notes".to_string(),
        };
        assert_eq!(body.validate().unwrap_err().field, "attendees");
    }
}

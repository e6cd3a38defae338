//! Shared validation helpers for request bodies.
//!
//! Handlers turn raw request DTOs into validated model inputs with these
//! helpers before touching the database.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use thiserror::Error;
use url::Url;

use incubator_core::Email;

use crate::services::auth::{self, AuthError};

/// Maximum length of short text fields (names, titles).
pub const MAX_SHORT_TEXT: usize = 200;

/// Maximum length of long text fields (descriptions, content, notes).
pub const MAX_LONG_TEXT: usize = 10_000;

/// Maximum length of meeting notes sent to the summarizer.
pub const MAX_NOTES_TEXT: usize = 50_000;

/// A field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Name of the offending field as it appears in the request.
    pub field: &'static str,
    /// Human-readable explanation.
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Trim `value` and require it to be non-empty and at most `max` characters.
pub fn required_text(field: &'static str, value: &str, max: usize) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(field, format!("{field} is required")));
    }
    check_length(field, trimmed, max)?;
    Ok(trimmed.to_owned())
}

/// Trim an optional value; blank becomes `None`.
pub fn optional_text(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<Option<String>, ValidationError> {
    let Some(trimmed) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    check_length(field, trimmed, max)?;
    Ok(Some(trimmed.to_owned()))
}

fn check_length(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::new(
            field,
            format!("{field} must be at most {max} characters"),
        ));
    }
    Ok(())
}

/// Parse an email address.
pub fn email(field: &'static str, value: &str) -> Result<Email, ValidationError> {
    Email::parse(value).map_err(|e| ValidationError::new(field, format!("invalid email: {e}")))
}

/// Check a new password against the password rules.
pub fn password(field: &'static str, value: &str) -> Result<(), ValidationError> {
    auth::validate_password(value).map_err(|e| match e {
        AuthError::WeakPassword(msg) => ValidationError::new(field, msg),
        other => ValidationError::new(field, other.to_string()),
    })
}

/// Parse an optional `http`/`https` URL; blank becomes `None`.
pub fn optional_url(field: &'static str, value: Option<&str>) -> Result<Option<String>, ValidationError> {
    let Some(raw) = optional_text(field, value, MAX_SHORT_TEXT)? else {
        return Ok(None);
    };

    let url = Url::parse(&raw)
        .map_err(|_| ValidationError::new(field, format!("{field} must be a valid URL")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ValidationError::new(
            field,
            format!("{field} must use http or https"),
        ));
    }

    Ok(Some(url.to_string()))
}

/// Require `ends_at`, when present, not to precede `starts_at`.
pub fn time_range(
    starts_at: DateTime<Utc>,
    ends_at: Option<DateTime<Utc>>,
) -> Result<(), ValidationError> {
    match ends_at {
        Some(end) if end < starts_at => Err(ValidationError::new(
            "ends_at",
            "ends_at must not be before starts_at",
        )),
        _ => Ok(()),
    }
}

/// Parse a calendar date in `YYYY-MM-DD` form.
pub fn date(field: &'static str, value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::new(field, format!("{field} must be a date in YYYY-MM-DD format")))
}

/// Parse a wall-clock time in `HH:MM` or `HH:MM:SS` form.
pub fn time(field: &'static str, value: &str) -> Result<NaiveTime, ValidationError> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|_| ValidationError::new(field, format!("{field} must be a time in HH:MM format")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_required_text_trims() {
        assert_eq!(required_text("title", "  Demo Day ", 50).unwrap(), "Demo Day");
    }

    #[test]
    fn test_required_text_rejects_blank() {
        let err = required_text("title", "   ", 50).unwrap_err();
        assert_eq!(err.field, "title");
        assert_eq!(err.message, "title is required");
    }

    #[test]
    fn test_required_text_rejects_too_long() {
        assert!(required_text("name", &"a".repeat(11), 10).is_err());
        assert!(required_text("name", &"a".repeat(10), 10).is_ok());
    }

    #[test]
    fn test_optional_text_blank_is_none() {
        assert_eq!(optional_text("phone", Some("  "), 20).unwrap(), None);
        assert_eq!(optional_text("phone", None, 20).unwrap(), None);
        assert_eq!(
            optional_text("phone", Some(" 555 "), 20).unwrap().as_deref(),
            Some("555")
        );
    }

    #[test]
    fn test_email_normalises() {
        assert_eq!(email("email", " Founder@Acme.IO ").unwrap().as_str(), "founder@acme.io");
        assert_eq!(email("email", "nope").unwrap_err().field, "email");
    }

    #[test]
    fn test_password_rules() {
        assert!(password("password", "longenough").is_ok());
        let err = password("password", "short").unwrap_err();
        assert!(err.message.contains("at least 8"));
    }

    #[test]
    fn test_optional_url() {
        assert_eq!(
            optional_url("website", Some("https://acme.io")).unwrap().as_deref(),
            Some("https://acme.io/")
        );
        assert_eq!(optional_url("website", Some("")).unwrap(), None);
        assert!(optional_url("website", Some("acme.io")).is_err());
        assert!(optional_url("website", Some("ftp://acme.io")).is_err());
    }

    #[test]
    fn test_time_range() {
        let start = Utc.with_ymd_and_hms(2026, 5, 1, 10, 0, 0).unwrap();
        let before = Utc.with_ymd_and_hms(2026, 5, 1, 9, 0, 0).unwrap();

        assert!(time_range(start, None).is_ok());
        assert!(time_range(start, Some(start)).is_ok());
        assert_eq!(time_range(start, Some(before)).unwrap_err().field, "ends_at");
    }

    #[test]
    fn test_date_and_time() {
        assert_eq!(
            date("meeting_date", "2026-03-09").unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 9).unwrap()
        );
        assert!(date("meeting_date", "09/03/2026").is_err());
        assert!(date("meeting_date", "2026-02-30").is_err());

        assert_eq!(
            time("meeting_time", "14:30").unwrap(),
            NaiveTime::from_hms_opt(14, 30, 0).unwrap()
        );
        assert_eq!(
            time("meeting_time", "09:05:10").unwrap(),
            NaiveTime::from_hms_opt(9, 5, 10).unwrap()
        );
        assert_eq!(time("meeting_time", "25:00").unwrap_err().field, "meeting_time");
    }
}

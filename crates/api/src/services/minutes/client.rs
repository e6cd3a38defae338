//! Gemini API client for meeting minutes.

use std::sync::Arc;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use tracing::instrument;

use crate::config::GeminiConfig;

use super::error::{ApiErrorResponse, MinutesError};
use super::types::{GenerateRequest, GenerateResponse, MinutesRequest};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Client that turns meeting notes into minutes via Gemini.
#[derive(Clone)]
pub struct MinutesClient {
    inner: Arc<MinutesClientInner>,
}

struct MinutesClientInner {
    client: reqwest::Client,
    model: String,
    endpoint: String,
}

impl std::fmt::Debug for MinutesClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MinutesClient")
            .field("model", &self.inner.model)
            .finish_non_exhaustive()
    }
}

impl MinutesClient {
    /// Create a new minutes client.
    ///
    /// # Errors
    ///
    /// Returns `MinutesError::InvalidApiKey` if the key is not a valid header
    /// value, or `MinutesError::Http` if the HTTP client cannot be built.
    pub fn new(config: &GeminiConfig) -> Result<Self, MinutesError> {
        let mut api_key = HeaderValue::from_str(config.api_key.expose_secret())
            .map_err(|_| MinutesError::InvalidApiKey)?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("x-goog-api-key", api_key);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(60))
            .build()?;

        Ok(Self {
            inner: Arc::new(MinutesClientInner {
                client,
                endpoint: format!("{GEMINI_API_BASE}/{}:generateContent", config.model),
                model: config.model.clone(),
            }),
        })
    }

    /// Generate minutes for a meeting.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails, returns an error response,
    /// or produces no text.
    #[instrument(skip(self, request), fields(model = %self.inner.model, notes_len = request.notes.len()))]
    pub async fn summarize(&self, request: &MinutesRequest) -> Result<String, MinutesError> {
        let body = GenerateRequest::from_text(request.prompt());

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(handle_error_status(status, response).await);
        }

        let text = response.text().await?;
        let parsed: GenerateResponse = serde_json::from_str(&text)
            .map_err(|e| MinutesError::Parse(format!("Failed to parse response: {e}")))?;

        parsed.text().ok_or(MinutesError::EmptyResponse)
    }
}

/// Turn a non-success response into an error.
async fn handle_error_status(
    status: reqwest::StatusCode,
    response: reqwest::Response,
) -> MinutesError {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
        return MinutesError::RateLimited(retry_after);
    }

    match response.text().await {
        Ok(body) => parse_api_error(status, body),
        Err(e) => MinutesError::Http(e),
    }
}

fn parse_api_error(status: reqwest::StatusCode, body: String) -> MinutesError {
    match serde_json::from_str::<ApiErrorResponse>(&body) {
        Ok(api_error) => MinutesError::Api {
            status: api_error.error.status,
            message: api_error.error.message,
        },
        Err(_) => MinutesError::Api {
            status: status.to_string(),
            message: body,
        },
    }
}

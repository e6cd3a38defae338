//! Types for the Gemini `generateContent` API and the minutes prompt.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

/// Notes from a meeting, to be turned into minutes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MinutesRequest {
    pub title: Option<String>,
    pub attendees: Vec<String>,
    /// Raw notes or transcript.
    pub notes: String,
}

impl MinutesRequest {
    /// Build the prompt sent to the model.
    #[must_use]
    pub fn prompt(&self) -> String {
        let mut prompt = String::from(
            "You are the secretary of a startup incubator. Write formal minutes of meeting \
             from the notes below. Use these sections:\n\
             1. Summary (two to four sentences)\n\
             2. Key discussion points\n\
             3. Decisions\n\
             4. Action items, each with an owner and a due date when one is mentioned\n\
             Do not invent facts that are not in the notes.\n\n",
        );

        if let Some(title) = &self.title {
            let _ = writeln!(prompt, "Meeting: {title}");
        }
        if !self.attendees.is_empty() {
            let _ = writeln!(prompt, "Attendees: {}", self.attendees.join(", "));
        }

        prompt.push_str("Notes:\n");
        prompt.push_str(&self.notes);
        prompt
    }
}

// =============================================================================
// Request
// =============================================================================

/// Body of a `generateContent` call.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

impl GenerateRequest {
    /// A single-turn request containing `text`.
    #[must_use]
    pub fn from_text(text: String) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part { text: Some(text) }],
            }],
            generation_config: GenerationConfig::default(),
        }
    }
}

/// A turn in the conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// One piece of content. Only text parts are used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Sampling parameters.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            max_output_tokens: 2048,
        }
    }
}

// =============================================================================
// Response
// =============================================================================

/// Response of a `generateContent` call.
#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate, if it has any.
    #[must_use]
    pub fn text(&self) -> Option<String> {
        let candidate = self.candidates.first()?;
        let text: String = candidate
            .content
            .as_ref()?
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();

        let trimmed = text.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

/// A generated answer.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    pub finish_reason: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_includes_title_attendees_and_notes() {
        let request = MinutesRequest {
            title: Some("Weekly sync".to_string()),
            attendees: vec!["Asha".to_string(), "Ben".to_string()],
            notes: "Agreed to launch beta in May.".to_string(),
        };

        let prompt = request.prompt();
        assert!(prompt.contains("Meeting: Weekly sync\n"));
        assert!(prompt.contains("Attendees: Asha, Ben\n"));
        assert!(prompt.ends_with("Notes:\nAgreed to launch beta in May."));
        assert!(prompt.contains("Action items"));
    }

    #[test]
    fn test_prompt_omits_missing_sections() {
        let request = MinutesRequest {
            notes: "n".to_string(),
            ..MinutesRequest::default()
        };

        let prompt = request.prompt();
        assert!(!prompt.contains("Meeting:"));
        assert!(!prompt.contains("Attendees:"));
    }

    #[test]
    fn test_request_serializes_in_camel_case() {
        let json = serde_json::to_value(GenerateRequest::from_text("hi".to_string())).unwrap();

        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 2048);
    }

    #[test]
    fn test_response_text_joins_parts() {
        let json = r#"{
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Summary: "}, {"text": "ok"}]},
                "finishReason": "STOP"
            }]
        }"#;

        let response: GenerateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text().as_deref(), Some("Summary: ok"));
        assert_eq!(
            response.candidates[0].finish_reason.as_deref(),
            Some("STOP")
        );
    }

    #[test]
    fn test_response_without_text_is_none() {
        let blocked: GenerateResponse =
            serde_json::from_str(r#"{"candidates": [{"finishReason": "SAFETY"}]}"#).unwrap();
        assert!(blocked.text().is_none());

        let empty: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.text().is_none());
    }
}

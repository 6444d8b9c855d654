//! Live adapter for the Gemini `generateContent` API.

use base64::Engine;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::media::ImagePayload;
use crate::ports::generation_client::{CandidateFuture, ValidateFuture};
use crate::ports::{
    CandidateRequest, GeneratedImage, GenerationClient, GenerationError, ValidationError, Verdict,
};

const ERROR_BODY_LIMIT: usize = 500;

/// Gemini client: a text model for verdicts and an image model for candidates.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    endpoint: String,
    validation_model: String,
    image_model: String,
}

impl GeminiClient {
    /// Create a client for the given key, endpoint and resolved model names.
    #[must_use]
    pub fn new(
        api_key: String,
        endpoint: String,
        validation_model: String,
        image_model: String,
    ) -> Self {
        Self {
            client: Client::new(),
            api_key,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            validation_model,
            image_model,
        }
    }

    /// POST a `generateContent` body and return the raw response text.
    async fn call(&self, model: &str, body: &serde_json::Value) -> Result<String, String> {
        let url = format!("{}/{model}:generateContent", self.endpoint);
        debug!(model, "calling generateContent");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        let text = response.text().await.map_err(|e| e.to_string())?;
        if !status.is_success() {
            warn!(model, status = status.as_u16(), "generateContent failed");
            return Err(format!("HTTP {}: {}", status.as_u16(), truncate(&text)));
        }
        Ok(text)
    }
}

impl GenerationClient for GeminiClient {
    fn validate<'a>(&'a self, image: &'a ImagePayload, instruction: &'a str) -> ValidateFuture<'a> {
        Box::pin(async move {
            let body = serde_json::json!({
                "contents": [{ "parts": request_parts(image, instruction) }],
                "generationConfig": {
                    "responseMimeType": "application/json",
                    "responseSchema": {
                        "type": "OBJECT",
                        "properties": {
                            "isValid": { "type": "BOOLEAN" },
                            "feedback": { "type": "STRING" },
                        },
                        "required": ["isValid", "feedback"],
                    },
                },
            });

            let text = self
                .call(&self.validation_model, &body)
                .await
                .map_err(ValidationError::Transport)?;
            parse_verdict(&text)
        })
    }

    fn generate_candidate<'a>(&'a self, request: CandidateRequest<'a>) -> CandidateFuture<'a> {
        Box::pin(async move {
            let mut generation_config = serde_json::json!({ "responseModalities": ["IMAGE"] });
            if let Some(ratio) = request.aspect_ratio {
                generation_config["imageConfig"] = serde_json::json!({ "aspectRatio": ratio });
            }

            let body = serde_json::json!({
                "contents": [{ "parts": request_parts(request.image, request.instruction) }],
                "generationConfig": generation_config,
            });

            let text = self
                .call(&self.image_model, &body)
                .await
                .map_err(GenerationError::Transport)?;
            extract_candidate(&text)
        })
    }
}

fn request_parts(image: &ImagePayload, instruction: &str) -> serde_json::Value {
    serde_json::json!([
        { "inlineData": { "mimeType": image.mime_type(), "data": image.encoded() } },
        { "text": instruction },
    ])
}

fn truncate(text: &str) -> String {
    if text.chars().count() > ERROR_BODY_LIMIT {
        let head: String = text.chars().take(ERROR_BODY_LIMIT).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

/// Parse a structured-output response into a verdict.
fn parse_verdict(body: &str) -> Result<Verdict, ValidationError> {
    let parsed: GeminiResponse = serde_json::from_str(body)
        .map_err(|e| ValidationError::Malformed(format!("response is not JSON: {e}")))?;

    let text: String = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(ValidationError::Malformed("no text in response".to_string()));
    }

    serde_json::from_str(text.trim())
        .map_err(|e| ValidationError::Malformed(format!("unexpected verdict shape: {e}")))
}

/// Pull the first inline image out of a response, or classify why there is none.
fn extract_candidate(body: &str) -> Result<GeneratedImage, GenerationError> {
    let parsed: GeminiResponse = serde_json::from_str(body)
        .map_err(|e| GenerationError::Transport(format!("Failed to parse response: {e}")))?;

    let block_reason = parsed.prompt_feedback.and_then(|f| f.block_reason);
    let mut finish_reason = None;

    if let Some(candidate) = parsed.candidates.into_iter().next() {
        finish_reason = candidate.finish_reason;
        for part in candidate.content.map(|c| c.parts).unwrap_or_default() {
            if let Some(inline) = part.inline_data {
                let data = base64::engine::general_purpose::STANDARD
                    .decode(&inline.data)
                    .map_err(|e| {
                        GenerationError::Transport(format!("Failed to decode base64: {e}"))
                    })?;
                return Ok(GeneratedImage { data, mime_type: inline.mime_type });
            }
        }
    }

    let err = classify_missing_image(block_reason.as_deref().or(finish_reason.as_deref()));
    warn!(error = %err, "no image in response");
    Err(err)
}

/// Map a block or finish reason to the error raised when no image came back.
fn classify_missing_image(reason: Option<&str>) -> GenerationError {
    match reason {
        Some(
            "SAFETY" | "IMAGE_SAFETY" | "PROHIBITED_CONTENT" | "IMAGE_PROHIBITED_CONTENT"
            | "BLOCKLIST" | "SPII",
        ) => GenerationError::SafetyBlocked,
        Some("RECITATION" | "IMAGE_RECITATION") => GenerationError::RecitationBlocked,
        other => GenerationError::NoCandidate { reason: other.map(str::to_string) },
    }
}

// --- Gemini API response types ---

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    prompt_feedback: Option<GeminiPromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    text: Option<String>,
    inline_data: Option<GeminiInlineData>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiInlineData {
    mime_type: String,
    data: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    block_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn verdict_from_structured_text() {
        let body = json!({
            "candidates": [{
                "content": { "parts": [{ "text": " {\"isValid\": true, \"feedback\": \"ok\"}\n" }] },
                "finishReason": "STOP"
            }]
        });
        let verdict = parse_verdict(&body.to_string()).unwrap();
        assert!(verdict.is_valid);
        assert_eq!(verdict.feedback, "ok");
    }

    #[test]
    fn verdict_with_wrong_shape_is_malformed() {
        let body = json!({
            "candidates": [{ "content": { "parts": [{ "text": "{\"valid\": true}" }] } }]
        });
        assert!(matches!(parse_verdict(&body.to_string()), Err(ValidationError::Malformed(_))));
    }

    #[test]
    fn verdict_without_text_is_malformed() {
        assert!(matches!(parse_verdict("{}"), Err(ValidationError::Malformed(_))));
        assert!(matches!(parse_verdict("<html>"), Err(ValidationError::Malformed(_))));
    }

    #[test]
    fn image_part_is_decoded() {
        let body = json!({
            "candidates": [{
                "content": { "parts": [
                    { "text": "Here you go" },
                    { "inlineData": { "mimeType": "image/png", "data": "AQID" } }
                ] },
                "finishReason": "STOP"
            }]
        });
        let image = extract_candidate(&body.to_string()).unwrap();
        assert_eq!(image.data, vec![1, 2, 3]);
        assert_eq!(image.mime_type, "image/png");
    }

    #[test]
    fn safety_finish_reason_is_classified() {
        let body = json!({
            "candidates": [{ "content": { "parts": [] }, "finishReason": "IMAGE_SAFETY" }]
        });
        assert_eq!(extract_candidate(&body.to_string()), Err(GenerationError::SafetyBlocked));
    }

    #[test]
    fn prompt_block_reason_is_classified() {
        let body = json!({ "promptFeedback": { "blockReason": "SAFETY" } });
        assert_eq!(extract_candidate(&body.to_string()), Err(GenerationError::SafetyBlocked));
    }

    #[test]
    fn recitation_is_classified() {
        let body = json!({ "candidates": [{ "finishReason": "RECITATION" }] });
        assert_eq!(extract_candidate(&body.to_string()), Err(GenerationError::RecitationBlocked));
    }

    #[test]
    fn text_only_answer_is_no_candidate() {
        let body = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "I can't help with that." }] },
                "finishReason": "STOP"
            }]
        });
        assert_eq!(
            extract_candidate(&body.to_string()),
            Err(GenerationError::NoCandidate { reason: Some("STOP".into()) })
        );
    }

    #[test]
    fn empty_response_is_no_candidate() {
        assert_eq!(extract_candidate("{}"), Err(GenerationError::NoCandidate { reason: None }));
    }

    #[test]
    fn bad_base64_is_transport_error() {
        let body = json!({
            "candidates": [{
                "content": { "parts": [{ "inlineData": { "mimeType": "image/png", "data": "%%%" } }] }
            }]
        });
        assert!(matches!(extract_candidate(&body.to_string()), Err(GenerationError::Transport(_))));
    }

    #[test]
    fn truncate_long_bodies() {
        let long = "x".repeat(ERROR_BODY_LIMIT + 10);
        assert_eq!(truncate(&long).len(), ERROR_BODY_LIMIT + 3);
        assert_eq!(truncate("short"), "short");
    }
}

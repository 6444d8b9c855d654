//! Remote generation port: photo validation and candidate image generation.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::media::ImagePayload;

/// Structured validity judgment returned by the model for an uploaded photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    /// Whether the photo is usable as a base.
    pub is_valid: bool,
    /// Short explanation, shown to the user when the photo is rejected.
    pub feedback: String,
}

/// A single generated image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedImage {
    /// Raw image bytes (decoded from base64).
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
    /// MIME type of the image (e.g., `"image/png"`).
    pub mime_type: String,
}

/// Input for one candidate generation call.
#[derive(Debug, Clone, Copy)]
pub struct CandidateRequest<'a> {
    /// The user's photo.
    pub image: &'a ImagePayload,
    /// Assembled instruction text.
    pub instruction: &'a str,
    /// Aspect ratio hint forwarded to the model (e.g., `"3:4"`).
    pub aspect_ratio: Option<&'a str>,
}

/// Failures of the validation call. Both are treated as a failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ValidationError {
    /// The model answered, but not with the expected two-field JSON.
    #[error("malformed validation response: {0}")]
    Malformed(String),
    /// Network, auth or quota failure.
    #[error("validation request failed: {0}")]
    Transport(String),
}

impl ValidationError {
    /// Generic message shown next to the uploader.
    #[must_use]
    pub fn user_message(&self) -> String {
        "We could not analyze your photo. Please try again or use a different photo.".to_string()
    }
}

/// Reasons a generation call produced no image.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GenerationError {
    /// The request or output was blocked by the model's safety filters.
    #[error("generation blocked by safety policy")]
    SafetyBlocked,
    /// The output was stopped for resembling existing content.
    #[error("generation blocked for recitation")]
    RecitationBlocked,
    /// The model finished without an image part.
    #[error("no candidate image produced (finish reason: {})", reason.as_deref().unwrap_or("none"))]
    NoCandidate {
        /// Finish reason reported by the model, if any.
        reason: Option<String>,
    },
    /// Network, auth or quota failure.
    #[error("generation request failed: {0}")]
    Transport(String),
}

impl GenerationError {
    /// Explanation shown to the user when generation does not complete.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::SafetyBlocked => "The image was blocked by the model's safety policy. \
                                    Please try a different photo or different options."
                .to_string(),
            Self::RecitationBlocked => "The model stopped because the result resembled existing \
                                        content. Please adjust your options and try again."
                .to_string(),
            Self::NoCandidate { .. } => {
                "The model did not return an image. Please try again.".to_string()
            }
            Self::Transport(_) => {
                "Could not reach the image service. Please check your connection and try again."
                    .to_string()
            }
        }
    }
}

/// Boxed future returned by [`GenerationClient::validate`].
pub type ValidateFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Verdict, ValidationError>> + Send + 'a>>;

/// Boxed future returned by [`GenerationClient::generate_candidate`].
pub type CandidateFuture<'a> =
    Pin<Box<dyn Future<Output = Result<GeneratedImage, GenerationError>> + Send + 'a>>;

/// Stateless client for the remote multimodal model. No retries are performed.
pub trait GenerationClient: Send + Sync {
    /// Ask the model whether `image` is usable, following `instruction`.
    fn validate<'a>(&'a self, image: &'a ImagePayload, instruction: &'a str)
        -> ValidateFuture<'a>;

    /// Produce one candidate image.
    fn generate_candidate<'a>(&'a self, request: CandidateRequest<'a>) -> CandidateFuture<'a>;
}

/// Serde helper for serializing `Vec<u8>` as base64 strings in cassettes.
mod base64_bytes {
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize bytes as base64 string.
    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(data);
        serializer.serialize_str(&encoded)
    }

    /// Deserialize base64 string to bytes.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        base64::engine::general_purpose::STANDARD.decode(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_uses_camel_case_fields() {
        let verdict: Verdict =
            serde_json::from_str(r#"{"isValid": false, "feedback": "Face is blurry"}"#).unwrap();
        assert!(!verdict.is_valid);
        assert_eq!(verdict.feedback, "Face is blurry");
    }

    #[test]
    fn verdict_requires_both_fields() {
        assert!(serde_json::from_str::<Verdict>(r#"{"isValid": true}"#).is_err());
        assert!(serde_json::from_str::<Verdict>(r#"{"isValid": "yes", "feedback": ""}"#).is_err());
    }

    #[test]
    fn generated_image_serializes_data_as_base64() {
        let image = GeneratedImage {
            data: vec![0xFF, 0xD8, 0xFF, 0xE0], // JPEG magic bytes
            mime_type: "image/jpeg".into(),
        };
        let json = serde_json::to_value(&image).unwrap();
        assert_eq!(json["data"], "/9j/4A==");
    }

    #[test]
    fn generation_errors_keep_their_class_through_serde() {
        let errors = [
            GenerationError::SafetyBlocked,
            GenerationError::RecitationBlocked,
            GenerationError::NoCandidate { reason: Some("OTHER".into()) },
            GenerationError::Transport("timeout".into()),
        ];
        for err in errors {
            let json = serde_json::to_string(&err).unwrap();
            let back: GenerationError = serde_json::from_str(&json).unwrap();
            assert_eq!(back, err);
        }
    }

    #[test]
    fn user_messages_hide_technical_detail() {
        let err = GenerationError::Transport("HTTP 500: {\"error\": ...}".into());
        assert!(!err.user_message().contains("HTTP 500"));
        let err = ValidationError::Malformed("expected value at line 1".into());
        assert!(err.user_message().contains("could not analyze"));
        assert!(GenerationError::SafetyBlocked.user_message().contains("safety policy"));
    }
}

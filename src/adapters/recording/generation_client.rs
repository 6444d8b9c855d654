//! Recording adapter for the `GenerationClient` port.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::{begin_call, end_call};
use crate::cassette::recorder::CassetteRecorder;
use crate::media::ImagePayload;
use crate::ports::generation_client::{CandidateFuture, ValidateFuture};
use crate::ports::{CandidateRequest, GenerationClient};

const PORT: &str = "generation_client";

/// What a cassette keeps of a request. The photo itself is summarized, not stored.
#[derive(Serialize)]
struct RecordedRequest<'a> {
    source_name: &'a str,
    mime_type: &'a str,
    byte_len: usize,
    instruction: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    aspect_ratio: Option<&'a str>,
}

impl<'a> RecordedRequest<'a> {
    fn new(image: &'a ImagePayload, instruction: &'a str, aspect_ratio: Option<&'a str>) -> Self {
        Self {
            source_name: image.source_name(),
            mime_type: image.mime_type(),
            byte_len: image.bytes().len(),
            instruction,
            aspect_ratio,
        }
    }
}

/// Records client interactions while delegating to an inner implementation.
pub struct RecordingGenerationClient {
    inner: Box<dyn GenerationClient>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingGenerationClient {
    /// Creates a new recording client wrapping the given implementation.
    pub fn new(inner: Box<dyn GenerationClient>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

// Slots are taken when the call is made, not when its future resolves, so
// parallel candidates land in the cassette in the order replay serves them.
impl GenerationClient for RecordingGenerationClient {
    fn validate<'a>(&'a self, image: &'a ImagePayload, instruction: &'a str) -> ValidateFuture<'a> {
        let input = RecordedRequest::new(image, instruction, None);
        let seq = begin_call(&self.recorder, PORT, "validate", &input);
        let call = self.inner.validate(image, instruction);
        Box::pin(async move {
            let result = call.await;
            end_call(&self.recorder, seq, &result);
            result
        })
    }

    fn generate_candidate<'a>(&'a self, request: CandidateRequest<'a>) -> CandidateFuture<'a> {
        let input = RecordedRequest::new(request.image, request.instruction, request.aspect_ratio);
        let seq = begin_call(&self.recorder, PORT, "generate", &input);
        let call = self.inner.generate_candidate(request);
        Box::pin(async move {
            let result = call.await;
            end_call(&self.recorder, seq, &result);
            result
        })
    }
}

//! Replaying adapter for the `GenerationClient` port.

use std::sync::{Arc, Mutex};

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::media::ImagePayload;
use crate::ports::generation_client::{CandidateFuture, ValidateFuture};
use crate::ports::{
    CandidateRequest, GeneratedImage, GenerationClient, GenerationError, ValidationError, Verdict,
};

const PORT: &str = "generation_client";

/// Serves recorded verdicts and candidates from a cassette.
pub struct ReplayingGenerationClient {
    replayer: Arc<Mutex<CassetteReplayer>>,
}

impl ReplayingGenerationClient {
    /// Create a replaying client backed by the given replayer.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self { replayer }
    }
}

impl GenerationClient for ReplayingGenerationClient {
    fn validate<'a>(&'a self, _image: &'a ImagePayload, _instruction: &'a str) -> ValidateFuture<'a> {
        let outcome = next_output(&self.replayer, PORT, "validate")
            .and_then(|output| replay_result::<Verdict, ValidationError>(&output))
            .unwrap_or_else(|e| Err(ValidationError::Transport(e)));
        Box::pin(async move { outcome })
    }

    fn generate_candidate<'a>(&'a self, _request: CandidateRequest<'a>) -> CandidateFuture<'a> {
        // Taken before the future is polled so parallel candidates replay in call order.
        let outcome = next_output(&self.replayer, PORT, "generate")
            .and_then(|output| replay_result::<GeneratedImage, GenerationError>(&output))
            .unwrap_or_else(|e| Err(GenerationError::Transport(e)));
        Box::pin(async move { outcome })
    }
}

//! In-memory client for unit tests: serves queued outcomes and records calls.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::media::ImagePayload;
use crate::ports::generation_client::{CandidateFuture, ValidateFuture};
use crate::ports::{
    CandidateRequest, GeneratedImage, GenerationClient, GenerationError, ValidationError, Verdict,
};

/// Encode a 2x2 PNG filled with `shade`, so different shades give different bytes.
pub fn png_image(shade: u8) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(2, 2, image::Rgb([shade, shade, shade]));
    let mut buf = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img).write_to(&mut buf, image::ImageFormat::Png).unwrap();
    buf.into_inner()
}

/// A valid verdict.
pub fn pass() -> Result<Verdict, ValidationError> {
    Ok(Verdict { is_valid: true, feedback: "Looks good.".into() })
}

/// Scripted [`GenerationClient`].
#[derive(Default)]
pub struct ScriptedClient {
    verdicts: Mutex<VecDeque<Result<Verdict, ValidationError>>>,
    candidates: Mutex<VecDeque<Result<GeneratedImage, GenerationError>>>,
    validate_instructions: Mutex<Vec<String>>,
    generate_instructions: Mutex<Vec<String>>,
    aspect_ratios: Mutex<Vec<Option<String>>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_verdict(self, verdict: Result<Verdict, ValidationError>) -> Self {
        self.verdicts.lock().unwrap().push_back(verdict);
        self
    }

    pub fn with_candidate(self, candidate: Result<Vec<u8>, GenerationError>) -> Self {
        let candidate = candidate.map(|data| GeneratedImage { data, mime_type: "image/png".into() });
        self.candidates.lock().unwrap().push_back(candidate);
        self
    }

    pub fn validate_calls(&self) -> usize {
        self.validate_instructions.lock().unwrap().len()
    }

    pub fn generate_calls(&self) -> usize {
        self.generate_instructions.lock().unwrap().len()
    }

    pub fn last_generate_instruction(&self) -> Option<String> {
        self.generate_instructions.lock().unwrap().last().cloned()
    }

    pub fn last_validate_instruction(&self) -> Option<String> {
        self.validate_instructions.lock().unwrap().last().cloned()
    }

    pub fn last_aspect_ratio(&self) -> Option<String> {
        self.aspect_ratios.lock().unwrap().last().cloned().flatten()
    }
}

impl GenerationClient for ScriptedClient {
    fn validate<'a>(&'a self, _image: &'a ImagePayload, instruction: &'a str) -> ValidateFuture<'a> {
        self.validate_instructions.lock().unwrap().push(instruction.to_string());
        let outcome = self
            .verdicts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ValidationError::Transport("script exhausted".into())));
        Box::pin(async move { outcome })
    }

    fn generate_candidate<'a>(&'a self, request: CandidateRequest<'a>) -> CandidateFuture<'a> {
        self.generate_instructions.lock().unwrap().push(request.instruction.to_string());
        self.aspect_ratios.lock().unwrap().push(request.aspect_ratio.map(str::to_string));
        let outcome = self
            .candidates
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GenerationError::Transport("script exhausted".into())));
        Box::pin(async move { outcome })
    }
}

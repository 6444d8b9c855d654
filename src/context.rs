//! Service context: picks the live, recording or replaying generation client.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use crate::adapters::live::gemini::GeminiClient;
use crate::adapters::recording::generation_client::RecordingGenerationClient;
use crate::adapters::replaying::generation_client::ReplayingGenerationClient;
use crate::cassette::config::load_cassette;
use crate::cassette::recorder::CassetteRecorder;
use crate::config::Config;
use crate::error::AppError;
use crate::model::resolve_gemini_model;
use crate::ports::GenerationClient;

/// Set to `1` or `true` to record live calls into a cassette.
pub const RECORD_ENV: &str = "PHOTOFORGE_REC";
/// Path of a cassette to replay instead of calling the API.
pub const REPLAY_ENV: &str = "PHOTOFORGE_REPLAY";

/// The ports a run talks through.
pub struct ServiceContext {
    /// Remote generation client.
    pub client: Arc<dyn GenerationClient>,
}

/// Handle to a recording session that must be finished after use.
pub struct RecordingSession {
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingSession {
    /// Write the cassette. Every client sharing the recorder must be dropped first.
    ///
    /// # Errors
    ///
    /// Returns an error if the recorder is still shared or the file cannot be written.
    pub fn finish(self) -> Result<PathBuf, String> {
        let recorder = Arc::try_unwrap(self.recorder)
            .map_err(|_| "Recording adapter still has references".to_string())?
            .into_inner()
            .map_err(|e| format!("Recorder lock poisoned: {e}"))?;
        if recorder.is_empty() {
            warn!("no interactions recorded");
        }
        recorder.finish().map_err(|e| format!("Failed to write cassette: {e}"))
    }
}

impl ServiceContext {
    /// Pick the mode from the environment: replay wins over record, else live.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette cannot be loaded or the live client
    /// cannot be configured.
    pub fn from_env(config: &Config) -> Result<(Self, Option<RecordingSession>), AppError> {
        if let Some(path) = std::env::var(REPLAY_ENV).ok().filter(|p| !p.is_empty()) {
            info!(cassette = %path, "replaying");
            return Ok((Self::replaying(Path::new(&path))?, None));
        }
        let recording = std::env::var(RECORD_ENV).is_ok_and(|v| v == "1" || v == "true");
        if recording {
            let (ctx, session) = Self::recording(config)?;
            Ok((ctx, Some(session)))
        } else {
            Ok((Self::live(config)?, None))
        }
    }

    /// Create a live context talking to Gemini.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing or a model name is not a Gemini model.
    pub fn live(config: &Config) -> Result<Self, AppError> {
        Ok(Self { client: Arc::new(live_client(config)?) })
    }

    /// Create a recording context that wraps the live client with a recorder.
    ///
    /// # Errors
    ///
    /// Returns an error if the live client cannot be configured.
    pub fn recording(config: &Config) -> Result<(Self, RecordingSession), AppError> {
        let live = live_client(config)?;

        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let path = PathBuf::from(".photoforge/cassettes")
            .join(&timestamp)
            .join("generation_client.cassette.yaml");
        info!(path = %path.display(), "recording");

        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(
            path,
            format!("{timestamp}-generation_client"),
            get_commit_hash(),
        )));
        let client = RecordingGenerationClient::new(Box::new(live), Arc::clone(&recorder));

        Ok((Self { client: Arc::new(client) }, RecordingSession { recorder }))
    }

    /// Create a replaying context from a cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be loaded.
    pub fn replaying(path: &Path) -> Result<Self, AppError> {
        let replayer = load_cassette(path)
            .map_err(|e| AppError::Config(format!("Failed to load cassette: {e}")))?;
        let client = ReplayingGenerationClient::new(Arc::new(Mutex::new(replayer)));
        Ok(Self { client: Arc::new(client) })
    }
}

fn live_client(config: &Config) -> Result<GeminiClient, AppError> {
    let key = config.gemini_key().ok_or(AppError::MissingApiKey)?;
    let validation_model =
        resolve_gemini_model(&config.models.validation).map_err(AppError::Config)?;
    let image_model = resolve_gemini_model(&config.models.image).map_err(AppError::Config)?;
    Ok(GeminiClient::new(key, config.models.endpoint.clone(), validation_model, image_model))
}

/// Get the current git commit hash, or "unknown" if unavailable.
fn get_commit_hash() -> String {
    std::process::Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map_or_else(|| "unknown".to_string(), |s| s.trim().to_string())
}

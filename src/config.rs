//! Configuration file loading with environment variable overrides.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::generation::CandidatePolicy;

/// Default REST base for the Gemini models API.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// API key configuration.
    #[serde(default)]
    pub keys: KeysConfig,

    /// Model selection.
    #[serde(default)]
    pub models: ModelsConfig,

    /// Candidate generation behaviour.
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Photo acceptance criteria per feature.
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Camera capture.
    #[serde(default)]
    pub camera: CameraConfig,

    /// Default option values (used when CLI flags are absent).
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// API key configuration.
#[derive(Debug, Default, Deserialize)]
pub struct KeysConfig {
    /// Gemini API key.
    pub gemini: Option<String>,
}

/// Which models to call, and where.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// Text model used for structured validation verdicts.
    pub validation: String,
    /// Image model used for generation.
    pub image: String,
    /// REST base URL.
    pub endpoint: String,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            validation: "gemini-2.5-flash".to_string(),
            image: "nano-banana".to_string(),
            endpoint: GEMINI_API_BASE.to_string(),
        }
    }
}

/// Candidate generation settings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// What happens when one of two parallel candidates fails.
    pub candidate_policy: CandidatePolicy,
}

/// Acceptance criteria interpolated into the validation instruction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ValidationCriteria {
    /// When the photo counts as usable.
    pub accept: String,
    /// When the photo must be rejected.
    pub reject: String,
}

/// Validation criteria per feature.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Passport photo criteria.
    pub passport: ValidationCriteria,
    /// Portrait criteria.
    pub portrait: ValidationCriteria,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            passport: ValidationCriteria {
                accept: "a person's face is reasonably clear, visible, and facing forward"
                    .to_string(),
                reject: "it is not a photo of a person, or the face is completely obscured, \
                         blurry, or at a sharp angle"
                    .to_string(),
            },
            portrait: ValidationCriteria {
                accept: "a person's face is reasonably clear and visible".to_string(),
                reject: "it is not a photo of a person, or the face is completely obscured or \
                         blurry"
                    .to_string(),
            },
        }
    }
}

/// Camera capture settings.
#[derive(Debug, Default, Deserialize)]
pub struct CameraConfig {
    /// Program and arguments that print one still frame (PNG or JPEG) to stdout.
    #[serde(default)]
    pub command: Vec<String>,
}

/// Default option values from config file.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Default passport country.
    pub country: String,
    /// Default passport attire.
    pub attire: String,
    /// Default portrait style.
    pub style: String,
    /// Directory downloads are saved to.
    pub out_dir: PathBuf,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            country: "United States".to_string(),
            attire: "No Change".to_string(),
            style: "Corporate Headshot".to_string(),
            out_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Load configuration from the given path, or return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
        toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
    }

    /// Get the Gemini API key, preferring environment variable.
    #[must_use]
    pub fn gemini_key(&self) -> Option<String> {
        std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.keys.gemini.clone())
    }
}

/// Discover the config file path using the resolution order:
/// 1. Explicit path (from `--config` flag)
/// 2. `PHOTOFORGE_CONFIG` environment variable
/// 3. `~/.config/photoforge/config.toml`
#[must_use]
pub fn discover_config_path(explicit: Option<&str>) -> PathBuf {
    if let Some(p) = explicit {
        return PathBuf::from(p);
    }

    if let Ok(p) = std::env::var("PHOTOFORGE_CONFIG") {
        return PathBuf::from(p);
    }

    default_config_path()
}

/// Default config path: `~/.config/photoforge/config.toml`.
fn default_config_path() -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".config/photoforge/config.toml")
    } else {
        PathBuf::from("photoforge.toml")
    }
}

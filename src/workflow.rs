//! Per-feature workflow: upload, validate, collect options, generate, present.
//!
//! A [`Workflow`] owns everything its feature holds for the session: the
//! uploaded photo, the selected options and the generated result. Remote
//! failures never escape it; they become a message on an earlier stage.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::config::ValidationCriteria;
use crate::generation::{self, CandidatePolicy};
use crate::media::{AcquisitionError, ImagePayload};
use crate::options::{Feature, GenerationOptions};
use crate::output::{download_stem, extension_for_image, save_download};
use crate::ports::{CandidateRequest, GeneratedImage, GenerationClient};
use crate::prompts;

/// Generated candidates plus the current download selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedResult {
    images: Vec<GeneratedImage>,
    selected: usize,
    stem: String,
}

impl GeneratedResult {
    fn new(images: Vec<GeneratedImage>, stem: String) -> Self {
        Self { images, selected: 0, stem }
    }

    /// All candidates, in call order.
    #[must_use]
    pub fn images(&self) -> &[GeneratedImage] {
        &self.images
    }

    /// Index of the image that will be downloaded.
    #[must_use]
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// The image that will be downloaded.
    #[must_use]
    pub fn selected_image(&self) -> &GeneratedImage {
        &self.images[self.selected]
    }

    /// File name for the selected image; the extension follows its content.
    #[must_use]
    pub fn download_name(&self) -> String {
        let image = self.selected_image();
        format!("{}.{}", self.stem, extension_for_image(&image.data, &image.mime_type))
    }
}

/// Where a workflow is. Each stage carries exactly the data valid in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    /// Waiting for a photo; `error` explains why the last attempt failed.
    Upload {
        /// Message shown next to the uploader.
        error: Option<String>,
    },
    /// The remote model is judging the photo.
    Validating {
        /// Photo under review.
        payload: ImagePayload,
    },
    /// The photo passed; waiting for the user to configure and start generation.
    CollectingOptions {
        /// Accepted photo.
        payload: ImagePayload,
        /// Message from a failed generation attempt.
        error: Option<String>,
    },
    /// Candidates are being generated.
    Generating {
        /// Accepted photo.
        payload: ImagePayload,
    },
    /// Candidates are ready.
    Result {
        /// Generated images and selection.
        result: GeneratedResult,
    },
}

impl Default for Stage {
    fn default() -> Self {
        Self::Upload { error: None }
    }
}

impl Stage {
    /// Stage name for messages and logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Upload { .. } => "upload",
            Self::Validating { .. } => "validating",
            Self::CollectingOptions { .. } => "collecting-options",
            Self::Generating { .. } => "generating",
            Self::Result { .. } => "result",
        }
    }

    /// Error message carried by the stage, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Upload { error } | Self::CollectingOptions { error, .. } => error.as_deref(),
            _ => None,
        }
    }
}

/// Misuse of the workflow, as opposed to a failed photo or remote call.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The action is not available in the current stage.
    #[error("cannot {action} while in the {stage} stage")]
    WrongStage {
        /// Attempted action.
        action: &'static str,
        /// Current stage name.
        stage: &'static str,
    },

    /// Selection index outside the generated candidates.
    #[error("no candidate #{index}; {available} available")]
    NoSuchCandidate {
        /// Requested index (zero-based).
        index: usize,
        /// Number of candidates.
        available: usize,
    },

    /// The download could not be written.
    #[error("failed to save download: {0}")]
    Io(#[from] std::io::Error),
}

/// Receives every stage the workflow enters.
pub type StageObserver = Box<dyn Fn(Feature, &Stage, &GenerationOptions) + Send + Sync>;

/// Static settings for one workflow.
#[derive(Debug, Clone)]
pub struct WorkflowSettings {
    /// Acceptance criteria for this feature's photos.
    pub criteria: ValidationCriteria,
    /// Two-candidate join policy.
    pub policy: CandidatePolicy,
    /// Options restored on reset.
    pub defaults: GenerationOptions,
}

/// The controller for one feature instance.
pub struct Workflow {
    feature: Feature,
    client: Arc<dyn GenerationClient>,
    settings: WorkflowSettings,
    options: GenerationOptions,
    stage: Stage,
    observer: Option<StageObserver>,
}

impl fmt::Debug for Workflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workflow")
            .field("feature", &self.feature)
            .field("stage", &self.stage.name())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Workflow {
    /// Create a workflow in the `Upload` stage with default options.
    #[must_use]
    pub fn new(client: Arc<dyn GenerationClient>, settings: WorkflowSettings) -> Self {
        Self {
            feature: settings.defaults.feature(),
            client,
            options: settings.defaults.clone(),
            settings,
            stage: Stage::default(),
            observer: None,
        }
    }

    /// Report every stage change to `observer`.
    #[must_use]
    pub fn with_observer(mut self, observer: StageObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Which feature this workflow runs.
    #[must_use]
    pub fn feature(&self) -> Feature {
        self.feature
    }

    /// Current stage.
    #[must_use]
    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// Current options.
    #[must_use]
    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    /// Mutable options; available while uploading or collecting options.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::WrongStage`] once the options are frozen.
    pub fn options_mut(&mut self) -> Result<&mut GenerationOptions, WorkflowError> {
        match self.stage {
            Stage::Upload { .. } | Stage::CollectingOptions { .. } => Ok(&mut self.options),
            _ => Err(self.wrong_stage("change options")),
        }
    }

    /// Hand over the outcome of media acquisition.
    ///
    /// A failed acquisition stays in `Upload` with its message and makes no
    /// remote call. An accepted photo is validated; a passing verdict either
    /// pauses for options or generates immediately, depending on the feature.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::WrongStage`] outside the `Upload` stage.
    pub async fn submit(
        &mut self,
        acquired: Result<ImagePayload, AcquisitionError>,
    ) -> Result<(), WorkflowError> {
        if !matches!(self.stage, Stage::Upload { .. }) {
            return Err(self.wrong_stage("submit a photo"));
        }

        let payload = match acquired {
            Ok(payload) => payload,
            Err(e) => {
                debug!(feature = self.feature.slug(), error = %e, "photo rejected locally");
                self.enter(Stage::Upload { error: Some(e.user_message()) });
                return Ok(());
            }
        };

        let instruction = prompts::validation_instruction(&self.options, self.criteria());
        self.enter(Stage::Validating { payload });
        let verdict = match &self.stage {
            Stage::Validating { payload } => self.client.validate(payload, &instruction).await,
            _ => return Err(self.wrong_stage("validate")),
        };
        let Stage::Validating { payload } = std::mem::take(&mut self.stage) else {
            return Err(self.wrong_stage("validate"));
        };

        match verdict {
            Ok(v) if v.is_valid => {
                info!(feature = self.feature.slug(), "photo accepted");
                if self.feature.collects_options_after_validation() {
                    self.enter(Stage::CollectingOptions { payload, error: None });
                } else {
                    self.run_generation(payload).await;
                }
            }
            Ok(v) => {
                info!(feature = self.feature.slug(), feedback = %v.feedback, "photo rejected");
                self.enter(Stage::Upload { error: Some(v.feedback) });
            }
            Err(e) => {
                debug!(feature = self.feature.slug(), error = %e, "validation failed");
                self.enter(Stage::Upload { error: Some(e.user_message()) });
            }
        }
        Ok(())
    }

    /// Freeze the options and generate.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::WrongStage`] outside `CollectingOptions`.
    pub async fn generate(&mut self) -> Result<(), WorkflowError> {
        if !matches!(self.stage, Stage::CollectingOptions { .. }) {
            return Err(self.wrong_stage("generate"));
        }
        let Stage::CollectingOptions { payload, .. } = std::mem::take(&mut self.stage) else {
            return Err(self.wrong_stage("generate"));
        };
        self.run_generation(payload).await;
        Ok(())
    }

    async fn run_generation(&mut self, payload: ImagePayload) {
        let instruction = prompts::generation_instruction(&self.options);
        let stem = download_stem(
            payload.source_name(),
            self.feature.slug(),
            self.options.variant_label(),
        );
        let count = self.feature.candidate_count();
        debug!(feature = self.feature.slug(), ?count, "generating");

        self.enter(Stage::Generating { payload });
        let outcome = match &self.stage {
            Stage::Generating { payload } => {
                let request = CandidateRequest {
                    image: payload,
                    instruction: &instruction,
                    aspect_ratio: Some(self.options.model_aspect_ratio()),
                };
                generation::generate(self.client.as_ref(), request, count, self.settings.policy)
                    .await
            }
            _ => return,
        };
        let Stage::Generating { payload } = std::mem::take(&mut self.stage) else {
            return;
        };

        match outcome {
            Ok(images) => {
                info!(feature = self.feature.slug(), candidates = images.len(), "generated");
                self.enter(Stage::Result { result: GeneratedResult::new(images, stem) });
            }
            Err(e) => {
                debug!(feature = self.feature.slug(), error = %e, "generation failed");
                let error = Some(e.user_message());
                if self.feature.keeps_photo_on_generation_failure() {
                    self.enter(Stage::CollectingOptions { payload, error });
                } else {
                    self.enter(Stage::Upload { error });
                }
            }
        }
    }

    /// Choose which candidate to download.
    ///
    /// # Errors
    ///
    /// Returns an error outside `Result` or when `index` is out of range.
    pub fn select(&mut self, index: usize) -> Result<(), WorkflowError> {
        let Stage::Result { result } = &mut self.stage else {
            return Err(self.wrong_stage("select a candidate"));
        };
        if index >= result.images.len() {
            return Err(WorkflowError::NoSuchCandidate { index, available: result.images.len() });
        }
        result.selected = index;
        Ok(())
    }

    /// Save the selected candidate into `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error outside `Result` or when the file cannot be written.
    pub fn download(&self, dir: &Path) -> Result<PathBuf, WorkflowError> {
        let Stage::Result { result } = &self.stage else {
            return Err(self.wrong_stage("download"));
        };
        let path = save_download(dir, &result.download_name(), &result.selected_image().data)?;
        info!(path = %path.display(), candidate = result.selected() + 1, "downloaded");
        Ok(path)
    }

    /// Return to `Upload` with default options, dropping photo and result.
    pub fn reset(&mut self) {
        self.options = self.settings.defaults.clone();
        self.enter(Stage::default());
    }

    fn criteria(&self) -> &ValidationCriteria {
        &self.settings.criteria
    }

    fn enter(&mut self, stage: Stage) {
        debug!(feature = self.feature.slug(), stage = stage.name(), "enter");
        self.stage = stage;
        if let Some(observer) = &self.observer {
            observer(self.feature, &self.stage, &self.options);
        }
    }

    fn wrong_stage(&self, action: &'static str) -> WorkflowError {
        WorkflowError::WrongStage { action, stage: self.stage.name() }
    }
}

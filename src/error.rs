//! Top-level error type for photoforge.

use thiserror::Error;

use crate::workflow::WorkflowError;

/// Errors that end a photoforge run.
#[derive(Debug, Error)]
pub enum AppError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// Invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No API key configured.
    #[error("No API key for Gemini. Set GEMINI_API_KEY or add it to the config file.")]
    MissingApiKey,

    /// The photo was not accepted, or nothing could be generated from it.
    #[error("{0}")]
    Rejected(String),

    /// The user backed out of the camera flow.
    #[error("Cancelled.")]
    Cancelled,

    /// The controller refused an action.
    #[error(transparent)]
    Workflow(#[from] WorkflowError),
}

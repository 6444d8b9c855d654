//! Camera backed by an external frame-grab command (e.g. `fswebcam -`).
//!
//! The command must write one PNG or JPEG frame to stdout per invocation.

use std::io::ErrorKind;
use std::process::Command;

use image::RgbImage;
use tracing::debug;

use crate::media::AcquisitionError;
use crate::ports::{CaptureDevice, CaptureStream};

/// A [`CaptureDevice`] that shells out for each frame.
pub struct CommandCamera {
    argv: Vec<String>,
}

impl CommandCamera {
    /// Create a camera from the configured program and arguments.
    #[must_use]
    pub fn new(argv: Vec<String>) -> Self {
        Self { argv }
    }
}

impl CaptureDevice for CommandCamera {
    fn open(&self) -> Result<Box<dyn CaptureStream>, AcquisitionError> {
        if self.argv.is_empty() {
            return Err(AcquisitionError::CameraUnsupported);
        }
        Ok(Box::new(CommandStream { argv: self.argv.clone(), stopped: false }))
    }
}

struct CommandStream {
    argv: Vec<String>,
    stopped: bool,
}

impl CaptureStream for CommandStream {
    fn grab_frame(&mut self) -> Result<RgbImage, AcquisitionError> {
        if self.stopped {
            return Err(AcquisitionError::CaptureFailed("camera already released".into()));
        }
        let (program, args) = self.argv.split_first().ok_or(AcquisitionError::CameraUnsupported)?;
        debug!(program = %program, "grabbing frame");

        let output = Command::new(program).args(args).output().map_err(|e| match e.kind() {
            ErrorKind::NotFound => AcquisitionError::CameraUnsupported,
            ErrorKind::PermissionDenied => AcquisitionError::CameraPermissionDenied,
            _ => AcquisitionError::CaptureFailed(e.to_string()),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AcquisitionError::CaptureFailed(format!(
                "{program} exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        image::load_from_memory(&output.stdout)
            .map(|frame| frame.to_rgb8())
            .map_err(|e| AcquisitionError::CaptureFailed(format!("unreadable frame: {e}")))
    }

    fn stop(&mut self) {
        self.stopped = true;
    }
}

//! Upload handling: turns a picked file into a transport-ready [`ImagePayload`].

use std::path::Path;

use base64::Engine;
use thiserror::Error;

/// Largest accepted upload, in bytes (4 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 4 * 1024 * 1024;

/// MIME types accepted for uploads and captures.
pub const ACCEPTED_MIME_TYPES: &[&str] = &["image/png", "image/jpeg"];

/// Errors raised while acquiring a photo. All are recovered locally.
#[derive(Debug, Error)]
pub enum AcquisitionError {
    /// The file exceeds [`MAX_UPLOAD_BYTES`].
    #[error("file is {size} bytes, limit is {MAX_UPLOAD_BYTES}")]
    TooLarge {
        /// Size of the rejected file.
        size: u64,
    },

    /// The bytes are not a PNG or JPEG image.
    #[error("unsupported image type: {}", detected.as_deref().unwrap_or("unknown"))]
    UnsupportedType {
        /// MIME type sniffed from the content, if any.
        detected: Option<String>,
    },

    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Unreadable {
        /// Path that failed.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The OS refused access to the camera.
    #[error("camera permission denied")]
    CameraPermissionDenied,

    /// No camera is available or configured.
    #[error("no camera support")]
    CameraUnsupported,

    /// The camera was opened but grabbing a frame failed.
    #[error("camera capture failed: {0}")]
    CaptureFailed(String),

    /// "Use Photo" was requested before anything was captured.
    #[error("no photo captured")]
    NothingCaptured,
}

impl AcquisitionError {
    /// Short sentence suitable for showing next to the uploader.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::TooLarge { .. } => "File size should not exceed 4MB.".to_string(),
            Self::UnsupportedType { .. } => "Please choose a PNG or JPG image.".to_string(),
            Self::Unreadable { .. } => "Error reading file.".to_string(),
            Self::CameraPermissionDenied => {
                "Could not access camera. Please ensure camera permissions are granted.".to_string()
            }
            Self::CameraUnsupported => {
                "Camera capture is not available. Configure a capture command or upload a file."
                    .to_string()
            }
            Self::CaptureFailed(_) => "Could not capture a photo from the camera.".to_string(),
            Self::NothingCaptured => "Capture a photo before using it.".to_string(),
        }
    }
}

/// A normalized photo ready to send to the remote model. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    bytes: Vec<u8>,
    encoded: String,
    mime_type: String,
    source_name: String,
}

impl ImagePayload {
    /// Build a payload from raw bytes, enforcing size and type limits.
    ///
    /// # Errors
    ///
    /// Returns [`AcquisitionError::TooLarge`] or [`AcquisitionError::UnsupportedType`].
    pub fn from_bytes(
        bytes: Vec<u8>,
        source_name: impl Into<String>,
    ) -> Result<Self, AcquisitionError> {
        let size = bytes.len() as u64;
        if size > MAX_UPLOAD_BYTES {
            return Err(AcquisitionError::TooLarge { size });
        }

        let detected = sniff_mime(&bytes);
        let mime_type = match detected {
            Some(mime) if ACCEPTED_MIME_TYPES.contains(&mime) => mime.to_string(),
            other => {
                return Err(AcquisitionError::UnsupportedType {
                    detected: other.map(str::to_string),
                })
            }
        };

        let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);
        Ok(Self { bytes, encoded, mime_type, source_name: source_name.into() })
    }

    /// Raw image bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Base64 form sent over the wire.
    #[must_use]
    pub fn encoded(&self) -> &str {
        &self.encoded
    }

    /// MIME type detected from the content.
    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Original file name (or a synthesized one for captures).
    #[must_use]
    pub fn source_name(&self) -> &str {
        &self.source_name
    }
}

/// Detect an image MIME type from magic bytes.
#[must_use]
pub fn sniff_mime(data: &[u8]) -> Option<&'static str> {
    infer::get(data).map(|kind| kind.mime_type())
}

/// Read a picked file into a payload.
///
/// The size limit is checked against file metadata before reading, so an
/// oversized file is never loaded into memory.
///
/// # Errors
///
/// Returns an [`AcquisitionError`] when the file is too large, unreadable, or
/// not a PNG/JPEG image.
pub fn acquire_file(path: &Path) -> Result<ImagePayload, AcquisitionError> {
    let unreadable = |source| AcquisitionError::Unreadable { path: path.display().to_string(), source };

    let size = std::fs::metadata(path).map_err(unreadable)?.len();
    if size > MAX_UPLOAD_BYTES {
        return Err(AcquisitionError::TooLarge { size });
    }

    let bytes = std::fs::read(path).map_err(unreadable)?;
    let name = path.file_name().map_or_else(
        || "photo".to_string(),
        |n| n.to_string_lossy().into_owned(),
    );
    ImagePayload::from_bytes(bytes, name)
}

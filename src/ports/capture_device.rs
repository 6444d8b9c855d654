//! Camera port: opening a live stream and grabbing still frames.

use image::RgbImage;

use crate::media::AcquisitionError;

/// A camera that can be opened into a live stream.
pub trait CaptureDevice: Send + Sync {
    /// Open the camera. Fails when permission is denied or no camera exists.
    ///
    /// # Errors
    ///
    /// Returns an [`AcquisitionError`] describing why the camera is unavailable.
    fn open(&self) -> Result<Box<dyn CaptureStream>, AcquisitionError>;
}

/// A live camera stream holding the hardware until [`CaptureStream::stop`].
pub trait CaptureStream: Send {
    /// Grab the current frame as seen by the sensor (not mirrored).
    ///
    /// # Errors
    ///
    /// Returns [`AcquisitionError::CaptureFailed`] if no frame can be read.
    fn grab_frame(&mut self) -> Result<RgbImage, AcquisitionError>;

    /// Release the hardware. Called exactly once per opened stream.
    fn stop(&mut self);
}

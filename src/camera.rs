//! Camera capture flow: live stream, still capture, retake, use or cancel.

use image::{DynamicImage, ImageFormat};
use tracing::debug;

use crate::media::{AcquisitionError, ImagePayload};
use crate::ports::{CaptureDevice, CaptureStream};

/// An open camera. The stream is stopped exactly once: on [`CameraSession::use_photo`],
/// [`CameraSession::cancel`], or when the session is dropped.
pub struct CameraSession {
    stream: Option<Box<dyn CaptureStream>>,
    captured: Option<Vec<u8>>,
}

impl CameraSession {
    /// Open the device and start the live stream.
    ///
    /// # Errors
    ///
    /// Returns the device's error when permission is denied or no camera exists.
    pub fn open(device: &dyn CaptureDevice) -> Result<Self, AcquisitionError> {
        let stream = device.open()?;
        debug!("camera opened");
        Ok(Self { stream: Some(stream), captured: None })
    }

    /// Capture a still frame, mirrored to match the live preview, as JPEG.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame cannot be grabbed or encoded.
    pub fn capture(&mut self) -> Result<(u32, u32), AcquisitionError> {
        let stream = self.stream.as_mut().ok_or(AcquisitionError::CameraUnsupported)?;
        let frame = stream.grab_frame()?;
        let mirrored = image::imageops::flip_horizontal(&frame);
        let dimensions = mirrored.dimensions();

        let mut buf = std::io::Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(mirrored)
            .write_to(&mut buf, ImageFormat::Jpeg)
            .map_err(|e| AcquisitionError::CaptureFailed(e.to_string()))?;
        self.captured = Some(buf.into_inner());
        Ok(dimensions)
    }

    /// Discard the captured still and go back to the live stream.
    pub fn retake(&mut self) {
        self.captured = None;
    }

    /// Confirm the captured still, release the camera, and build the payload.
    ///
    /// # Errors
    ///
    /// Returns [`AcquisitionError::NothingCaptured`] if nothing was captured
    /// (the camera is released either way).
    pub fn use_photo(mut self) -> Result<ImagePayload, AcquisitionError> {
        let captured = self.captured.take();
        self.release();
        let bytes = captured.ok_or(AcquisitionError::NothingCaptured)?;
        ImagePayload::from_bytes(bytes, capture_file_name())
    }

    /// Abandon the capture and release the camera.
    pub fn cancel(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
            debug!("camera released");
        }
    }
}

impl Drop for CameraSession {
    fn drop(&mut self) {
        self.release();
    }
}

/// Timestamped name for a captured still.
fn capture_file_name() -> String {
    format!("capture-{}.jpg", chrono::Utc::now().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use image::{Rgb, RgbImage};

    use super::*;

    /// Device whose frames have a red left half, counting stops.
    struct FakeDevice {
        stops: Arc<AtomicUsize>,
        deny: bool,
    }

    struct FakeStream {
        stops: Arc<AtomicUsize>,
    }

    impl CaptureDevice for FakeDevice {
        fn open(&self) -> Result<Box<dyn CaptureStream>, AcquisitionError> {
            if self.deny {
                return Err(AcquisitionError::CameraPermissionDenied);
            }
            Ok(Box::new(FakeStream { stops: Arc::clone(&self.stops) }))
        }
    }

    impl CaptureStream for FakeStream {
        fn grab_frame(&mut self) -> Result<RgbImage, AcquisitionError> {
            Ok(RgbImage::from_fn(16, 8, |x, _| {
                if x < 8 {
                    Rgb([255, 0, 0])
                } else {
                    Rgb([0, 0, 0])
                }
            }))
        }

        fn stop(&mut self) {
            self.stops.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn device() -> (FakeDevice, Arc<AtomicUsize>) {
        let stops = Arc::new(AtomicUsize::new(0));
        (FakeDevice { stops: Arc::clone(&stops), deny: false }, stops)
    }

    #[test]
    fn use_photo_stops_stream_once() {
        let (device, stops) = device();
        let mut session = CameraSession::open(&device).unwrap();
        assert_eq!(session.capture().unwrap(), (16, 8));
        let payload = session.use_photo().unwrap();
        assert_eq!(stops.load(Ordering::SeqCst), 1);
        assert_eq!(payload.mime_type(), "image/jpeg");
        assert!(payload.source_name().starts_with("capture-"));
        assert!(payload.source_name().ends_with(".jpg"));
    }

    #[test]
    fn cancel_stops_stream_once() {
        let (device, stops) = device();
        let mut session = CameraSession::open(&device).unwrap();
        session.capture().unwrap();
        session.cancel();
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn drop_releases_stream() {
        let (device, stops) = device();
        {
            let _session = CameraSession::open(&device).unwrap();
        }
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn retake_keeps_stream_running() {
        let (device, stops) = device();
        let mut session = CameraSession::open(&device).unwrap();
        session.capture().unwrap();
        session.retake();
        assert_eq!(stops.load(Ordering::SeqCst), 0);
        session.capture().unwrap();
        session.use_photo().unwrap();
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn use_without_capture_still_releases() {
        let (device, stops) = device();
        let session = CameraSession::open(&device).unwrap();
        let err = session.use_photo().unwrap_err();
        assert!(matches!(err, AcquisitionError::NothingCaptured));
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn capture_is_mirrored() {
        let (device, _stops) = device();
        let mut session = CameraSession::open(&device).unwrap();
        session.capture().unwrap();
        let payload = session.use_photo().unwrap();
        let decoded = image::load_from_memory(payload.bytes()).unwrap().to_rgb8();
        // red half moved from the left to the right
        let right = decoded.get_pixel(13, 4);
        let left = decoded.get_pixel(2, 4);
        assert!(right[0] > 128, "right half should be red, got {right:?}");
        assert!(left[0] < 128, "left half should be dark, got {left:?}");
    }

    #[test]
    fn permission_denied_is_reported() {
        let stops = Arc::new(AtomicUsize::new(0));
        let device = FakeDevice { stops: Arc::clone(&stops), deny: true };
        let err = CameraSession::open(&device).err().unwrap();
        assert!(matches!(err, AcquisitionError::CameraPermissionDenied));
        assert_eq!(stops.load(Ordering::SeqCst), 0);
    }
}

//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the application core and an
//! external system. Implementations live in `src/adapters/`.

pub mod capture_device;
pub mod generation_client;

pub use capture_device::{CaptureDevice, CaptureStream};
pub use generation_client::{
    CandidateRequest, GeneratedImage, GenerationClient, GenerationError, ValidationError, Verdict,
};

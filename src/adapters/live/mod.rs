//! Live adapters talking to real services and hardware.

pub mod command_camera;
pub mod gemini;

//! Adapter implementations for port traits.
//!
//! - `live/`: Gemini API client and command-driven camera
//! - `recording/`: Record client interactions to cassettes
//! - `replaying/`: Replay client interactions from cassettes

pub mod live;
pub mod recording;
pub mod replaying;

#[cfg(test)]
pub mod scripted;

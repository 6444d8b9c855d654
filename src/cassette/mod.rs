//! Record/replay of remote client interactions as YAML cassettes.

pub mod config;
pub mod format;
pub mod recorder;
pub mod replayer;

//! Collects client interactions and writes them out as a cassette.
//!
//! A call takes its slot when it starts and fills in the outcome when it
//! finishes, so concurrent calls keep the order they were made in.

use std::path::PathBuf;

use chrono::Utc;
use serde_json::Value;
use tracing::{info, warn};

use super::format::{Cassette, Interaction};

/// A started call. `output` stays empty until the call returns.
#[derive(Debug)]
struct Slot {
    port: String,
    method: String,
    input: Value,
    output: Option<Value>,
}

/// In-memory cassette under construction.
#[derive(Debug)]
pub struct CassetteRecorder {
    path: PathBuf,
    name: String,
    commit: String,
    slots: Vec<Slot>,
}

impl CassetteRecorder {
    /// Start a recording that [`CassetteRecorder::finish`] will write to `path`.
    pub fn new(
        path: impl Into<PathBuf>,
        name: impl Into<String>,
        commit: impl Into<String>,
    ) -> Self {
        Self { path: path.into(), name: name.into(), commit: commit.into(), slots: Vec::new() }
    }

    /// Reserve the next sequence number for a call that is about to start.
    pub fn open(&mut self, port: &str, method: &str, input: Value) -> u64 {
        self.slots.push(Slot {
            port: port.to_string(),
            method: method.to_string(),
            input,
            output: None,
        });
        (self.slots.len() - 1) as u64
    }

    /// Store the outcome of the call holding `seq`. Returns false for an
    /// unknown or already closed slot.
    pub fn close(&mut self, seq: u64, output: Value) -> bool {
        let slot = usize::try_from(seq).ok().and_then(|i| self.slots.get_mut(i));
        match slot {
            Some(slot) if slot.output.is_none() => {
                slot.output = Some(output);
                true
            }
            _ => false,
        }
    }

    /// Whether no call has been started.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Write the cassette as YAML, creating parent directories. Calls that
    /// never returned are left out.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn finish(self) -> Result<PathBuf, std::io::Error> {
        let started = self.slots.len();
        let interactions: Vec<Interaction> = self
            .slots
            .into_iter()
            .enumerate()
            .filter_map(|(seq, slot)| {
                slot.output.map(|output| Interaction {
                    seq: seq as u64,
                    port: slot.port,
                    method: slot.method,
                    input: slot.input,
                    output,
                })
            })
            .collect();
        if interactions.len() < started {
            warn!(dropped = started - interactions.len(), "unfinished calls left out of cassette");
        }

        let count = interactions.len();
        let cassette =
            Cassette { name: self.name, recorded_at: Utc::now(), commit: self.commit, interactions };
        let yaml = serde_yaml::to_string(&cassette).map_err(std::io::Error::other)?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, yaml)?;
        info!(path = %self.path.display(), interactions = count, "cassette written");
        Ok(self.path)
    }
}

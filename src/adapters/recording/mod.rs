//! Recording adapters that capture interactions to cassettes.

pub mod generation_client;

use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::warn;

use crate::cassette::recorder::CassetteRecorder;

/// Take a cassette slot for a call before it runs. `None` means the call
/// goes unrecorded.
pub(crate) fn begin_call<I: Serialize>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
) -> Option<u64> {
    let input = match serde_json::to_value(input) {
        Ok(v) => v,
        Err(e) => {
            warn!(port, method, error = %e, "skipping unserializable request");
            return None;
        }
    };
    match recorder.lock() {
        Ok(mut guard) => Some(guard.open(port, method, input)),
        Err(e) => {
            warn!(port, method, error = %e, "recorder lock poisoned");
            None
        }
    }
}

/// Store a call's `Result` in its slot using the Ok/Err JSON convention.
///
/// Errors are stored in their serialized form so a replay yields the same
/// error variant, not just its message.
pub(crate) fn end_call<T, E>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    seq: Option<u64>,
    result: &Result<T, E>,
) where
    T: Serialize,
    E: Serialize,
{
    let Some(seq) = seq else { return };
    let output = match result {
        Ok(v) => serde_json::to_value(v).map(|v| serde_json::json!({ "Ok": v })),
        Err(e) => serde_json::to_value(e).map(|e| serde_json::json!({ "Err": e })),
    };
    let output = match output {
        Ok(v) => v,
        Err(e) => {
            warn!(seq, error = %e, "skipping unserializable outcome");
            return;
        }
    };
    match recorder.lock() {
        Ok(mut guard) => {
            if !guard.close(seq, output) {
                warn!(seq, "outcome for a slot that is not open");
            }
        }
        Err(e) => warn!(seq, error = %e, "recorder lock poisoned"),
    }
}

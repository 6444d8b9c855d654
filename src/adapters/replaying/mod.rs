//! Replaying adapters that serve recorded interactions from cassettes.

pub mod generation_client;

use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;

use crate::cassette::replayer::CassetteReplayer;

/// Retrieve the next recorded output for a given port and method.
pub(crate) fn next_output(
    replayer: &Arc<Mutex<CassetteReplayer>>,
    port: &str,
    method: &str,
) -> Result<serde_json::Value, String> {
    let mut guard = replayer.lock().map_err(|e| format!("replayer lock poisoned: {e}"))?;
    Ok(guard.next_interaction(port, method)?.output)
}

/// Deserialize a replayed output as the recorded `Result<T, E>`.
///
/// The outer error means the cassette itself is unusable.
pub(crate) fn replay_result<T, E>(output: &serde_json::Value) -> Result<Result<T, E>, String>
where
    T: DeserializeOwned,
    E: DeserializeOwned,
{
    if let Some(err_val) = output.get("Err").or_else(|| output.get("err")) {
        return serde_json::from_value(err_val.clone())
            .map(Err)
            .map_err(|e| format!("unreadable recorded error: {e}"));
    }
    let ok_val = output.get("Ok").or_else(|| output.get("ok")).unwrap_or(output);
    serde_json::from_value(ok_val.clone())
        .map(Ok)
        .map_err(|e| format!("unreadable recorded output: {e}"))
}

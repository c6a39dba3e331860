//! Parsing of Terraform state documents.
//!
//! Operates on in-memory bytes only; obtaining them (`terraform state pull`,
//! reading a file) is the caller's job. Every failure maps to
//! `RelocateError::SnapshotUnavailable` or `UnsupportedStateVersion`.

use serde_json::Value;

use crate::errors::{RelocateError, RelocateResult};
use crate::model::TerraformState;
use crate::version::StateVersion;

/// Default maximum state size accepted (256 MiB).
pub const DEFAULT_MAX_STATE_BYTES: usize = 256 * 1024 * 1024;

/// Parse JSON bytes into a `serde_json::Value` with a hard size limit.
pub fn parse_json_bytes(bytes: &[u8], max_bytes: usize) -> RelocateResult<Value> {
    if bytes.len() > max_bytes {
        return Err(RelocateError::snapshot_unavailable(format!(
            "state payload too large ({} bytes > limit {})",
            bytes.len(),
            max_bytes
        )));
    }

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(RelocateError::snapshot_unavailable("state is empty"));
    }

    serde_json::from_slice(bytes)
        .map_err(|e| RelocateError::snapshot_unavailable(format!("failed to parse JSON: {e}")))
}

/// Read the format `version` field of a state document.
pub fn read_version(v: &Value) -> RelocateResult<StateVersion> {
    let obj = v
        .as_object()
        .ok_or_else(|| RelocateError::snapshot_unavailable("expected JSON object"))?;
    let ver = obj
        .get("version")
        .and_then(Value::as_u64)
        .ok_or_else(|| RelocateError::snapshot_unavailable("missing state format version"))?;
    StateVersion::parse(ver)
}

/// Parse bytes into a `TerraformState`.
pub fn parse_state_bytes(bytes: &[u8], max_bytes: usize) -> RelocateResult<TerraformState> {
    let v = parse_json_bytes(bytes, max_bytes)?;
    read_version(&v)?;
    serde_json::from_value(v)
        .map_err(|e| RelocateError::snapshot_unavailable(format!("failed to decode terraform state: {e}")))
}

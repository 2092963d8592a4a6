//! Error types for state and preset operations.

use thiserror::Error;

/// Errors from decoding snapshots or resolving presets.
#[derive(Debug, Error)]
pub enum StateError {
    /// A control-state snapshot could not be decoded.
    #[error("failed to parse control-state snapshot: {0}")]
    ParseSnapshot(#[from] serde_json::Error),

    /// No preset with the given name exists in the catalog.
    #[error("preset not found: {0}")]
    PresetNotFound(String),
}

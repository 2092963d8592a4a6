//! Resona State - the declarative control-state model
//!
//! Defines [`ControlState`], the full snapshot of every user-adjustable
//! parameter the engine maps onto the audio graph, together with its JSON
//! wire format, per-field defaults, and the embedded factory preset catalog.
//!
//! The snapshot contract (one complete state per update, missing pieces
//! default-filled) lives entirely in this crate so the engine can treat
//! every incoming state as total.

pub mod error;
pub mod preset;
pub mod state;

pub use error::StateError;
pub use preset::{FACTORY_PRESET_NAMES, Preset, factory_preset};
pub use state::{ControlState, EQ_BANDS, EnhanceParams, Mode, SpatialParams, ToneParams};

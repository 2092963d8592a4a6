//! Resona Engine - effects-graph construction, state mapping, and lifecycle
//!
//! This crate owns the runtime side of resona: the fixed [`AudioGraph`]
//! built around each wrapped media element, the mapper that translates
//! [`resona_state::ControlState`] snapshots into smoothed parameter targets,
//! procedural synthesis of the reverb impulse and warmth curve, and the
//! connection lifecycle that decides when to attach, retry, and tear down.
//!
//! Sample-level DSP is delegated to the host runtime. The engine describes
//! topology and schedules control-rate parameter motion; the host renders.
//!
//! ```
//! use resona_engine::{Engine, MediaElement, Message};
//! use resona_state::ControlState;
//!
//! struct Element(f32);
//! impl MediaElement for Element {
//!     fn identity(&self) -> u64 { 1 }
//!     fn playback_rate(&self) -> f32 { self.0 }
//!     fn set_playback_rate(&mut self, rate: f32) { self.0 = rate; }
//! }
//!
//! let mut engine = Engine::new(48_000.0);
//! engine.media_detected(Element(1.0));
//! engine.attach()?;
//!
//! let state = ControlState::parse(r#"{"enabled":true,"mode":"concert"}"#)?;
//! engine.handle_message(Message::UpdateSettings(state));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod engine;
pub mod graph;
pub mod lifecycle;
pub mod mapper;
pub mod media;
pub mod render;

pub use engine::{Engine, EngineError, Message, Reply};
pub use graph::{
    AudioGraph, EARLY_BRANCHES, EQ_CENTER_FREQUENCIES, EarlyBranch, GraphHandles, SPATIAL_BRANCHES,
    SpatialBranch,
};
pub use lifecycle::{
    ConnectionLifecycle, ConnectionState, LifecycleAction, LifecycleEvent, RetryPolicy,
};
pub use media::MediaElement;
pub use render::{RenderCache, RenderError, synthesize_impulse, warmth_curve};

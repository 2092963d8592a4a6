//! The media-source handle contract.
//!
//! The engine never touches the DOM or the host's element model directly; it
//! only needs two things from the playing media element: a stable identity
//! (to detect when the source changes under it) and playback-rate control.
//! The discovery layer implements this trait and hands elements to the
//! engine.

/// A playable media element as seen by the engine.
pub trait MediaElement {
    /// Stable identity of the underlying element.
    ///
    /// Two handles to the same element must report the same identity; a new
    /// element after navigation must report a different one.
    fn identity(&self) -> u64;

    /// Current playback rate (1.0 = normal speed).
    fn playback_rate(&self) -> f32;

    /// Set the playback rate.
    ///
    /// Callers only write when the delta from the current rate exceeds 0.01,
    /// so hosts that restart decoding on rate writes are not thrashed.
    fn set_playback_rate(&mut self, rate: f32);
}

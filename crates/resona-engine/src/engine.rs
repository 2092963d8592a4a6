//! The per-document engine session.
//!
//! [`Engine`] ties the pieces together: it holds the authoritative
//! [`ControlState`], the [`AudioGraph`] for the currently wrapped media
//! element, the render-buffer cache, and the [`ConnectionLifecycle`]. The
//! host forwards controller messages and discovery events; the engine keeps
//! the graph's parameter targets in sync.
//!
//! One engine per document. Navigation discards the graph, the wrapper, and
//! the render cache; the control state survives, so the next attachment
//! starts from the user's settings rather than defaults.

use resona_core::GraphError;
use resona_state::ControlState;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::graph::AudioGraph;
use crate::lifecycle::{ConnectionLifecycle, ConnectionState, LifecycleAction, LifecycleEvent};
use crate::mapper;
use crate::media::MediaElement;
use crate::render::RenderCache;

/// Errors from engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Building the audio graph failed.
    #[error("graph construction failed: {0}")]
    Graph(#[from] GraphError),

    /// Attach was requested with no media element pending.
    #[error("no media element pending attachment")]
    NoMedia,
}

/// Controller-to-engine messages.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Replace the control state with a fresh snapshot.
    UpdateSettings(ControlState),
    /// Liveness probe. Always answered, graph or not.
    Ping,
}

/// Engine-to-controller replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    /// The engine is alive.
    Ack,
}

/// One document's audio-effects session.
pub struct Engine<M: MediaElement> {
    sample_rate: f32,
    state: ControlState,
    graph: Option<AudioGraph>,
    media: Option<M>,
    attached_identity: Option<u64>,
    lifecycle: ConnectionLifecycle,
    cache: RenderCache,
}

impl<M: MediaElement> Engine<M> {
    /// Create a disconnected engine with the default (disabled) state.
    pub fn new(sample_rate: f32) -> Self {
        Self::with_initial_state(sample_rate, ControlState::default())
    }

    /// Create a disconnected engine seeded from a stored control state.
    ///
    /// This is how persisted settings reach a fresh document: the host loads
    /// them from storage and seeds the engine before discovery starts.
    pub fn with_initial_state(sample_rate: f32, state: ControlState) -> Self {
        Self {
            sample_rate,
            state,
            graph: None,
            media: None,
            attached_identity: None,
            lifecycle: ConnectionLifecycle::new(),
            cache: RenderCache::new(),
        }
    }

    /// The authoritative control state.
    pub fn state(&self) -> &ControlState {
        &self.state
    }

    /// Current connection state.
    pub fn connection_state(&self) -> ConnectionState {
        self.lifecycle.state()
    }

    /// The live graph, if a media element is wrapped.
    pub fn graph(&self) -> Option<&AudioGraph> {
        self.graph.as_ref()
    }

    /// Identity of the wrapped media element, if any.
    pub fn attached_identity(&self) -> Option<u64> {
        self.attached_identity
    }

    /// Handle one controller message.
    ///
    /// Settings updates are stored and, when a graph is live, mapped onto it
    /// immediately; with no graph they simply wait for the next attach.
    /// Pings are answered unconditionally.
    pub fn handle_message(&mut self, message: Message) -> Option<Reply> {
        match message {
            Message::UpdateSettings(state) => {
                self.state = state;
                self.apply();
                None
            }
            Message::Ping => Some(Reply::Ack),
        }
    }

    /// A candidate media element was discovered.
    ///
    /// The element is held until the host performs the returned action. An
    /// element already wrapped is left alone.
    pub fn media_detected(&mut self, media: M) -> LifecycleAction {
        if self.attached_identity == Some(media.identity()) && self.graph.is_some() {
            debug!(identity = media.identity(), "element already wrapped");
            return LifecycleAction::None;
        }
        self.media = Some(media);
        self.lifecycle.on_event(LifecycleEvent::MediaDetected)
    }

    /// The document mutated; the host may need to re-discover media.
    pub fn dom_mutated(&mut self) -> LifecycleAction {
        self.lifecycle.on_event(LifecycleEvent::DomMutated)
    }

    /// The user interacted with the page.
    pub fn user_interaction(&mut self) -> LifecycleAction {
        self.lifecycle.on_event(LifecycleEvent::UserInteraction)
    }

    /// Perform the attach the lifecycle asked for.
    ///
    /// Builds a fresh graph for the pending element, maps the current state
    /// onto it, and reports the outcome to the lifecycle. Re-attaching the
    /// already wrapped element is a no-op.
    pub fn attach(&mut self) -> Result<(), EngineError> {
        let Some(media) = self.media.as_ref() else {
            self.lifecycle.on_event(LifecycleEvent::AttachFailed);
            return Err(EngineError::NoMedia);
        };
        let identity = media.identity();

        if self.attached_identity == Some(identity) && self.graph.is_some() {
            self.lifecycle.on_event(LifecycleEvent::AttachAlreadyWrapped);
            return Ok(());
        }

        match AudioGraph::build(self.sample_rate) {
            Ok(graph) => {
                info!(identity, sample_rate = self.sample_rate, "wrapped media element");
                self.graph = Some(graph);
                self.attached_identity = Some(identity);
                self.apply();
                self.lifecycle.on_event(LifecycleEvent::AttachSucceeded);
                Ok(())
            }
            Err(err) => {
                warn!(%err, "graph construction failed");
                self.lifecycle.on_event(LifecycleEvent::AttachFailed);
                Err(err.into())
            }
        }
    }

    /// The document navigated away: tear everything down.
    ///
    /// Graph, wrapper, and render cache are discarded; the control state is
    /// kept for the next attachment. Returns the reattach action.
    pub fn navigated(&mut self) -> LifecycleAction {
        self.graph = None;
        self.media = None;
        self.attached_identity = None;
        self.cache = RenderCache::new();
        self.lifecycle.on_event(LifecycleEvent::Navigated)
    }

    /// Advance every smoothed parameter by one control block.
    pub fn advance(&mut self, samples: u32) {
        if let Some(graph) = &mut self.graph {
            graph.advance(samples);
        }
    }

    fn apply(&mut self) {
        if let Some(graph) = &mut self.graph {
            mapper::apply(&self.state, graph, self.media.as_mut(), &mut self.cache);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeMedia {
        id: u64,
        rate: f32,
    }

    impl MediaElement for FakeMedia {
        fn identity(&self) -> u64 {
            self.id
        }
        fn playback_rate(&self) -> f32 {
            self.rate
        }
        fn set_playback_rate(&mut self, rate: f32) {
            self.rate = rate;
        }
    }

    #[test]
    fn ping_answers_without_a_graph() {
        let mut engine: Engine<FakeMedia> = Engine::new(48000.0);
        assert_eq!(engine.handle_message(Message::Ping), Some(Reply::Ack));
        assert!(engine.graph().is_none());
    }

    #[test]
    fn settings_without_a_graph_wait_for_attach() {
        let mut engine: Engine<FakeMedia> = Engine::new(48000.0);
        let mut state = ControlState {
            enabled: true,
            ..ControlState::default()
        };
        state.enhance.master_vol = 50.0;

        assert_eq!(
            engine.handle_message(Message::UpdateSettings(state)),
            None
        );
        engine.media_detected(FakeMedia { id: 7, rate: 1.0 });
        engine.attach().unwrap();

        let graph = engine.graph().unwrap();
        assert_eq!(graph.master_gain.gain.target(), 0.5);
    }

    #[test]
    fn attach_without_media_fails_and_reports() {
        let mut engine: Engine<FakeMedia> = Engine::new(48000.0);
        assert!(matches!(engine.attach(), Err(EngineError::NoMedia)));
    }

    #[test]
    fn duplicate_attach_is_a_no_op() {
        let mut engine: Engine<FakeMedia> = Engine::new(48000.0);
        engine.media_detected(FakeMedia { id: 7, rate: 1.0 });
        engine.attach().unwrap();
        assert_eq!(engine.connection_state(), ConnectionState::Connected);

        assert_eq!(
            engine.media_detected(FakeMedia { id: 7, rate: 1.0 }),
            LifecycleAction::None
        );
        engine.attach().unwrap();
        assert_eq!(engine.attached_identity(), Some(7));
        assert_eq!(engine.connection_state(), ConnectionState::Connected);
    }

    #[test]
    fn navigation_discards_graph_but_keeps_state() {
        let mut state = ControlState {
            enabled: true,
            ..ControlState::default()
        };
        state.enhance.master_vol = 70.0;
        let mut engine: Engine<FakeMedia> = Engine::with_initial_state(48000.0, state);

        engine.media_detected(FakeMedia { id: 1, rate: 1.0 });
        engine.attach().unwrap();
        assert!(engine.graph().is_some());

        let action = engine.navigated();
        assert!(matches!(action, LifecycleAction::Teardown { .. }));
        assert!(engine.graph().is_none());
        assert_eq!(engine.attached_identity(), None);
        assert!(engine.state().enabled);

        // A new element after navigation picks the kept state back up.
        engine.media_detected(FakeMedia { id: 2, rate: 1.0 });
        engine.attach().unwrap();
        assert_eq!(engine.graph().unwrap().master_gain.gain.target(), 0.7);
    }
}

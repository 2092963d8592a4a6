//! Connection lifecycle: when to attach, retry, and tear down.
//!
//! The engine cannot own timers or observe the DOM, so the lifecycle is a
//! pure event-to-action state machine: the host feeds it discovery events
//! ([`LifecycleEvent`]) and schedules whatever [`LifecycleAction`] comes
//! back. Delays are returned as data, never slept on.
//!
//! States move `Disconnected → Connecting → Connected`; navigation drops
//! back to `Disconnected` from anywhere and resets the retry budget.

use std::time::Duration;

use tracing::{debug, info};

/// Where the engine stands with respect to a media source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// No media source wrapped.
    #[default]
    Disconnected,
    /// An attach has been requested but has not completed.
    Connecting,
    /// A media source is wrapped and the graph is live.
    Connected,
}

/// Discovery and attachment events fed in by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// A candidate media element appeared.
    MediaDetected,
    /// The document mutated in a way that may have swapped the media out.
    DomMutated,
    /// The user interacted with the page (gesture-gated hosts can now run).
    UserInteraction,
    /// Same-document navigation happened.
    Navigated,
    /// The requested attach completed and the graph is live.
    AttachSucceeded,
    /// The requested attach found the element already wrapped.
    AttachAlreadyWrapped,
    /// The requested attach failed.
    AttachFailed,
}

/// What the host should do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleAction {
    /// Nothing to schedule.
    None,
    /// Attempt an attach after the given delay.
    Attach {
        /// Debounce before the attempt.
        after: Duration,
    },
    /// Discard the current graph and wrapper, then attempt a fresh attach.
    Teardown {
        /// Delay before the follow-up attach, letting the new document settle.
        reattach_after: Duration,
    },
}

/// Retry pacing and budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Failed attaches tolerated before giving up until the next navigation.
    pub max_attempts: u32,
    /// Debounce applied to mutation-driven attach attempts.
    pub mutation_delay: Duration,
    /// Settle time after a navigation before reattaching.
    pub navigation_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            mutation_delay: Duration::from_millis(300),
            navigation_delay: Duration::from_millis(1200),
        }
    }
}

/// The event-driven connection state machine.
#[derive(Debug, Default)]
pub struct ConnectionLifecycle {
    state: ConnectionState,
    policy: RetryPolicy,
    failed_attempts: u32,
}

impl ConnectionLifecycle {
    /// Start disconnected with the default policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start disconnected with a custom retry policy.
    pub fn with_policy(policy: RetryPolicy) -> Self {
        Self {
            state: ConnectionState::Disconnected,
            policy,
            failed_attempts: 0,
        }
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Failed attach attempts since the last success or navigation.
    pub fn failed_attempts(&self) -> u32 {
        self.failed_attempts
    }

    /// Feed one event; returns the action the host should schedule.
    pub fn on_event(&mut self, event: LifecycleEvent) -> LifecycleAction {
        use ConnectionState::{Connected, Connecting, Disconnected};
        use LifecycleEvent as E;

        match (self.state, event) {
            // Fresh media or user gestures trigger an immediate attach when
            // nothing is wrapped.
            (Disconnected, E::MediaDetected | E::UserInteraction) => {
                self.state = Connecting;
                LifecycleAction::Attach {
                    after: Duration::ZERO,
                }
            }
            // Mutations are noisy, so they attach with a debounce.
            (Disconnected, E::DomMutated) => {
                self.state = Connecting;
                LifecycleAction::Attach {
                    after: self.policy.mutation_delay,
                }
            }

            (Connecting, E::AttachSucceeded) | (Connecting, E::AttachAlreadyWrapped) => {
                debug!("media attach settled");
                self.state = Connected;
                self.failed_attempts = 0;
                LifecycleAction::None
            }
            (Connecting, E::AttachFailed) => {
                self.failed_attempts += 1;
                if self.failed_attempts >= self.policy.max_attempts {
                    info!(
                        attempts = self.failed_attempts,
                        "attach retry budget exhausted, waiting for navigation"
                    );
                    self.state = Disconnected;
                    LifecycleAction::None
                } else {
                    LifecycleAction::Attach {
                        after: self.policy.mutation_delay,
                    }
                }
            }
            // Another detection while an attach is pending changes nothing.
            (Connecting, E::MediaDetected | E::DomMutated | E::UserInteraction) => {
                LifecycleAction::None
            }

            // A mutation while connected may mean the element was replaced;
            // the host decides by re-running discovery, the machine only
            // re-enters Connecting if the host reports a failure later.
            (Connected, E::MediaDetected | E::DomMutated | E::UserInteraction) => {
                LifecycleAction::None
            }
            (Connected, E::AttachSucceeded | E::AttachAlreadyWrapped) => LifecycleAction::None,
            (Connected, E::AttachFailed) => {
                self.state = Connecting;
                self.failed_attempts = 1;
                LifecycleAction::Attach {
                    after: self.policy.mutation_delay,
                }
            }

            // Navigation tears everything down from any state and restores
            // the retry budget.
            (_, E::Navigated) => {
                info!("navigation, tearing down audio graph");
                self.state = Disconnected;
                self.failed_attempts = 0;
                LifecycleAction::Teardown {
                    reattach_after: self.policy.navigation_delay,
                }
            }

            // Stale attach outcomes after teardown are dropped.
            (Disconnected, E::AttachSucceeded | E::AttachAlreadyWrapped | E::AttachFailed) => {
                LifecycleAction::None
            }
        }
    }
}

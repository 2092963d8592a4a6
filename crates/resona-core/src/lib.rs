//! Resona Core - control-rate primitives for the resona effects graph
//!
//! This crate provides the building blocks the engine wires together:
//!
//! - [`AutomatedParam`] - exponential-approach parameter smoothing, so
//!   control snapshots never produce audible stepping
//! - Node descriptors ([`FilterNode`], [`GainNode`], [`DelayNode`],
//!   [`PannerNode`], [`DynamicsNode`], [`ConvolverNode`],
//!   [`WaveshaperNode`]) - typed parameter surfaces for the host runtime's
//!   processing units
//! - [`Topology`] - a labeled adjacency-list DAG with cycle detection,
//!   describing the fixed wiring independently of parameter state
//!
//! Sample-level rendering is explicitly out of scope: the host audio runtime
//! executes filters, delays, convolution, and dynamics. resona-core only
//! describes the units and schedules their parameter values.
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible with `alloc`. Disable the default `std`
//! feature:
//!
//! ```toml
//! [dependencies]
//! resona-core = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod graph;
pub mod node;
pub mod param;

pub use graph::{GraphError, NodeId, Topology};
pub use node::{
    ConvolverNode, DelayNode, DynamicsNode, FilterKind, FilterNode, GainNode, ImpulseResponse,
    Oversample, PannerNode, TransferCurve, WaveshaperNode,
};
pub use param::{AutomatedParam, DEFAULT_TIME_CONSTANT_MS};

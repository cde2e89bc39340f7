//! Tick-based life simulation for Gaea.
//!
//! A [`Simulation`] owns a [`gaea_core::World`] together with a quadtree
//! [`SpatialIndex`] over every tile. Creatures run a needs-driven activity
//! state machine and find food or wander destinations by submitting typed
//! requests to a [`QueryBroker`]; the answers arrive on the following tick.
//! Plants grow and mature into their next stage. Time advances through a
//! [`TimeDriver`] that converts real seconds into whole virtual-second ticks
//! and can be paused, resumed and sped up.

/// Time driver turning real seconds into ticks.
pub mod clock;
/// Configuration types for simulation runs.
pub mod config;
/// Mutable context passed to systems each tick.
pub mod context;
/// Creature behaviour system.
pub mod creature;
/// Short-lived debug shapes.
pub mod debug;
/// Error types for the simulation crate.
pub mod error;
/// Simulation event types and the event log.
pub mod event;
/// Plant growth system.
pub mod plant;
/// Asynchronous spatial queries.
pub mod query;
/// Top-level simulation orchestrator.
pub mod simulation;
/// Quadtree spatial index.
pub mod spatial;
/// The trait that all simulation systems implement.
pub mod system;
/// Random starting worlds.
pub mod worldgen;

/// Re-export of [`clock::TimeDriver`].
pub use clock::TimeDriver;
/// Re-export of [`config::SimConfig`].
pub use config::SimConfig;
/// Re-export of [`context::SimContext`].
pub use context::SimContext;
/// Re-export of [`creature::CreatureSystem`].
pub use creature::CreatureSystem;
/// Re-exports of [`debug::DebugColor`], [`debug::DebugOverlay`] and [`debug::DebugShape`].
pub use debug::{DebugColor, DebugOverlay, DebugShape};
/// Re-exports of [`error::SimError`] and [`error::SimResult`].
pub use error::{SimError, SimResult};
/// Re-exports of [`event::EventLog`], [`event::SimEvent`], and [`event::SimEventKind`].
pub use event::{EventLog, SimEvent, SimEventKind};
/// Re-export of [`plant::PlantSystem`].
pub use plant::PlantSystem;
/// Re-exports of the query types.
pub use query::{QueryBroker, QueryPurpose, SpatialRequest, SpatialResponse};
/// Re-export of [`simulation::Simulation`].
pub use simulation::Simulation;
/// Re-export of [`spatial::SpatialIndex`].
pub use spatial::SpatialIndex;
/// Re-export of [`system::System`].
pub use system::System;
/// Re-exports of [`worldgen::WorldGenConfig`] and [`worldgen::generate`].
pub use worldgen::{WorldGenConfig, generate};

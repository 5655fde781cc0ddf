//! Core engine for pokecatch - encounter state machine and orchestration.
//!
//! # Layers
//!
//! - [`outcome`] - randomized capture decisions
//! - [`state`] - phases, timings, and the explicit transition edges
//! - [`orchestrator`] - synchronous core; every transition returns a [`Step`]
//! - [`driver`] - tokio task that schedules steps and publishes snapshots
//! - [`cues`] - injected sound capability
//!
//! The orchestrator never blocks, so it can be driven step by step in tests
//! without a runtime.

pub mod config;
pub mod cues;
pub mod driver;
pub mod orchestrator;
pub mod outcome;
pub mod state;

pub use config::{ConfigError, GameConfig};
pub use cues::{CueSink, MutedCues, RecordingCues};
pub use driver::{Command, DriverClosed, SessionHandle, spawn_session};
pub use orchestrator::{CollectionView, Orchestrator, Snapshot};
pub use outcome::RejectionDirection;
pub use state::{EncounterSession, Followup, Phase, PhaseTimings, Step};

pub use pokecatch_providers;
pub use pokecatch_store;
pub use pokecatch_types;

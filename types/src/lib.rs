//! Core domain types for pokecatch.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory
#![allow(clippy::missing_panics_doc)] // Panics are documented in assertions

mod creature;
mod creature_type;
mod cue;
mod ids;
mod progress;
mod random;

pub use creature::{CreatureRecord, SpeciesData};
pub use creature_type::CreatureType;
pub use cue::{Cue, CueIntent};
pub use ids::{SpeciesId, SpeciesIdError};
pub use progress::{Counters, DexProgress};
pub use random::{RandomSource, SequenceRandom, ThreadRandom};

/// Number of species in the playable generation.
pub const GENERATION_SIZE: u16 = 151;

/// Maximum number of creatures held in the roster.
pub const ROSTER_CAPACITY: usize = 6;

/// Throws allowed per encounter.
pub const MAX_ATTEMPTS: u8 = 3;

/// One in this many encounters is rare.
pub const RARITY_ODDS: u32 = 512;

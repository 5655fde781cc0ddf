//! Cue capability.
//!
//! The orchestrator never plays sound itself. It hands [`CueIntent`]s to a
//! [`CueSink`] owned by the composition root; the sink decides whether and
//! how to play them.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use pokecatch_types::{Cue, CueIntent};

pub trait CueSink: Send + Sync {
    fn play(&self, intent: &CueIntent);
    fn set_enabled(&self, enabled: bool);
    fn is_enabled(&self) -> bool;
}

/// Drops every cue. Logs at trace level when enabled.
#[derive(Debug)]
pub struct MutedCues {
    enabled: AtomicBool,
}

impl MutedCues {
    #[must_use]
    pub fn new() -> Self {
        Self {
            enabled: AtomicBool::new(true),
        }
    }
}

impl Default for MutedCues {
    fn default() -> Self {
        Self::new()
    }
}

impl CueSink for MutedCues {
    fn play(&self, intent: &CueIntent) {
        if self.is_enabled() {
            tracing::trace!(cue = intent.cue.label(), offset_ms = intent.offset.as_millis(), "cue");
        }
    }

    fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }
}

/// Keeps every intent played while enabled.
#[derive(Debug)]
pub struct RecordingCues {
    enabled: AtomicBool,
    played: Mutex<Vec<CueIntent>>,
}

impl RecordingCues {
    #[must_use]
    pub fn new() -> Self {
        Self {
            enabled: AtomicBool::new(true),
            played: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn intents(&self) -> Vec<CueIntent> {
        self.played
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn cues(&self) -> Vec<Cue> {
        self.intents().into_iter().map(|intent| intent.cue).collect()
    }

    pub fn clear(&self) {
        self.played
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Default for RecordingCues {
    fn default() -> Self {
        Self::new()
    }
}

impl CueSink for RecordingCues {
    fn play(&self, intent: &CueIntent) {
        if !self.is_enabled() {
            return;
        }
        self.played
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(intent.clone());
    }

    fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }
}

//! Encounter state machine types.

use std::time::Duration;

use pokecatch_types::{CreatureRecord, MAX_ATTEMPTS};

use crate::outcome::RejectionDirection;

/// Rendering phase of the current encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Throwing,
    Capturing,
    Fleeing,
    RejectedLeft,
    RejectedRight,
}

impl Phase {
    #[must_use]
    pub const fn rejected(direction: RejectionDirection) -> Self {
        match direction {
            RejectionDirection::Left => Self::RejectedLeft,
            RejectionDirection::Right => Self::RejectedRight,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Throwing => "throwing",
            Self::Capturing => "capturing",
            Self::Fleeing => "fleeing",
            Self::RejectedLeft => "rejected-left",
            Self::RejectedRight => "rejected-right",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How long each phase is held before the next transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseTimings {
    pub throw: Duration,
    pub capture: Duration,
    pub flee: Duration,
    pub reject: Duration,
    /// Pause between a failed throw and the rejection bounce.
    pub reject_lead_in: Duration,
    pub after_capture: Duration,
    pub after_flee: Duration,
    /// Delay of the rare-encounter cue behind the creature's cry.
    pub rare_cue_offset: Duration,
}

impl Default for PhaseTimings {
    fn default() -> Self {
        Self {
            throw: Duration::from_millis(1000),
            capture: Duration::from_millis(1500),
            flee: Duration::from_millis(800),
            reject: Duration::from_millis(600),
            reject_lead_in: Duration::from_millis(100),
            after_capture: Duration::from_millis(100),
            after_flee: Duration::from_millis(50),
            rare_cue_offset: Duration::from_millis(800),
        }
    }
}

impl PhaseTimings {
    /// Every hold zero. Cue offsets are kept so cues still do not overlap.
    #[must_use]
    pub fn instant() -> Self {
        Self {
            throw: Duration::ZERO,
            capture: Duration::ZERO,
            flee: Duration::ZERO,
            reject: Duration::ZERO,
            reject_lead_in: Duration::ZERO,
            after_capture: Duration::ZERO,
            after_flee: Duration::ZERO,
            ..Self::default()
        }
    }
}

/// Transient state of one encounter. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EncounterSession {
    pub current: Option<CreatureRecord>,
    pub attempts: u8,
    pub phase: Phase,
    /// Set while a guarded transition is in flight.
    pub processing: bool,
    /// Won on a full roster; committed once a slot is released.
    pub deferred: Option<CreatureRecord>,
    pub last_error: Option<String>,
}

impl EncounterSession {
    #[must_use]
    pub fn can_throw(&self) -> bool {
        self.current.is_some() && !self.processing && self.attempts > 0
    }

    #[must_use]
    pub fn can_flee(&self) -> bool {
        self.current.is_some() && !self.processing
    }

    #[must_use]
    pub fn can_start(&self) -> bool {
        !self.processing && self.deferred.is_none()
    }

    pub(crate) fn begin(&mut self, creature: CreatureRecord) {
        self.current = Some(creature);
        self.attempts = MAX_ATTEMPTS;
        self.phase = Phase::Idle;
        self.last_error = None;
    }

    /// Back to rest with no creature on screen.
    pub(crate) fn clear(&mut self) {
        self.current = None;
        self.attempts = 0;
        self.phase = Phase::Idle;
        self.processing = false;
    }
}

/// What the caller must schedule after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Nothing pending.
    Settled,
    /// Fetch the next creature, then report it back.
    Fetch,
    /// Wait `delay`, then advance with `then`.
    Hold { delay: Duration, then: Followup },
}

impl Step {
    pub(crate) const fn hold(delay: Duration, then: Followup) -> Self {
        Self::Hold { delay, then }
    }
}

/// Timed edges of the encounter state machine.
///
/// | From | Followup | To |
/// |------|----------|----|
/// | throwing | `ResolveThrow` | capturing, idle (deferred), fleeing, or a short pause |
/// | pause | `ShowRejection` | rejected-left / rejected-right |
/// | rejected-* | `SettleRejection` | idle |
/// | fleeing | `SettleFlee` | idle, then `StartNext` |
/// | capturing | `CommitCapture` | idle, then `StartNext` |
/// | idle | `StartNext` | next encounter, unless the player already started one |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Followup {
    ResolveThrow,
    ShowRejection(RejectionDirection),
    SettleRejection,
    SettleFlee,
    CommitCapture,
    StartNext,
}

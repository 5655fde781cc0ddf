//! Encounter orchestrator.
//!
//! Synchronous core of the game. Every entry point mutates the session and
//! returns a [`Step`] describing what the caller must schedule next; nothing
//! here sleeps or performs network IO. The async driver in
//! [`crate::driver`] turns those steps into timers and fetches.
//!
//! Player-initiated transitions (`start_encounter`, `attempt_capture`,
//! `flee`) are guarded by the session's `processing` flag and return `None`
//! when ignored. Release, favorites, and preferences are unguarded.

use std::collections::BTreeSet;
use std::sync::Arc;

use pokecatch_providers::ProviderError;
use pokecatch_store::{CollectionStore, KeyValueStore, StoreError};
use pokecatch_types::{
    Counters, CreatureRecord, Cue, CueIntent, DexProgress, GENERATION_SIZE, RandomSource,
    SpeciesId, ThreadRandom,
};

use crate::cues::CueSink;
use crate::outcome::{roll_capture_success, roll_rejection_direction};
use crate::state::{EncounterSession, Followup, Phase, PhaseTimings, Step};

/// Collection state as last read from the store.
///
/// Roster entries carry `is_favorite` joined from the favorites set at read
/// time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionView {
    pub roster: Vec<CreatureRecord>,
    pub captured: BTreeSet<SpeciesId>,
    pub encountered: BTreeSet<SpeciesId>,
    pub favorites: BTreeSet<SpeciesId>,
    pub counters: Counters,
    pub sound_enabled: bool,
    pub dark_mode: bool,
}

/// Everything a front end needs to render one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub phase: Phase,
    pub current: Option<CreatureRecord>,
    pub attempts: u8,
    pub processing: bool,
    pub deferred: Option<CreatureRecord>,
    pub last_error: Option<String>,
    pub collection: CollectionView,
    pub progress: DexProgress,
}

pub struct Orchestrator<S> {
    store: CollectionStore<S>,
    rng: Box<dyn RandomSource>,
    cues: Arc<dyn CueSink>,
    timings: PhaseTimings,
    generation_size: u16,
    dark_mode_default: bool,
    session: EncounterSession,
    view: CollectionView,
}

impl<S: KeyValueStore> Orchestrator<S> {
    pub fn new(store: CollectionStore<S>, cues: Arc<dyn CueSink>) -> Self {
        let mut orchestrator = Self {
            store,
            rng: Box::new(ThreadRandom),
            cues,
            timings: PhaseTimings::default(),
            generation_size: GENERATION_SIZE,
            dark_mode_default: false,
            session: EncounterSession::default(),
            view: CollectionView::default(),
        };
        orchestrator.reload();
        orchestrator.cues.set_enabled(orchestrator.view.sound_enabled);
        orchestrator
    }

    pub fn with_random(mut self, rng: Box<dyn RandomSource>) -> Self {
        self.rng = rng;
        self
    }

    pub fn with_timings(mut self, timings: PhaseTimings) -> Self {
        self.timings = timings;
        self
    }

    pub fn with_generation_size(mut self, generation_size: u16) -> Self {
        self.generation_size = generation_size;
        self
    }

    /// Ambient dark-mode preference used until the player picks one.
    pub fn with_dark_mode_default(mut self, dark_mode_default: bool) -> Self {
        self.dark_mode_default = dark_mode_default;
        self.view.dark_mode = self.store.dark_mode(dark_mode_default);
        self
    }

    #[must_use]
    pub fn session(&self) -> &EncounterSession {
        &self.session
    }

    #[must_use]
    pub fn collection(&self) -> &CollectionView {
        &self.view
    }

    #[must_use]
    pub fn timings(&self) -> &PhaseTimings {
        &self.timings
    }

    #[must_use]
    pub fn store(&self) -> &CollectionStore<S> {
        &self.store
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.session.phase,
            current: self.session.current.clone(),
            attempts: self.session.attempts,
            processing: self.session.processing,
            deferred: self.session.deferred.clone(),
            last_error: self.session.last_error.clone(),
            collection: self.view.clone(),
            progress: DexProgress {
                caught: self.view.captured.len(),
                seen: self.view.encountered.len(),
                total: self.generation_size,
            },
        }
    }

    // Encounter lifecycle

    /// Request the next creature. Ignored while processing or while a
    /// deferred capture is waiting for a free slot.
    pub fn start_encounter(&mut self) -> Option<Step> {
        if !self.session.can_start() {
            tracing::debug!(
                processing = self.session.processing,
                deferred = self.session.deferred.is_some(),
                "Ignoring start"
            );
            return None;
        }
        self.session.processing = true;
        Some(Step::Fetch)
    }

    /// Complete a [`Step::Fetch`].
    pub fn encounter_fetched(&mut self, result: Result<CreatureRecord, ProviderError>) -> Step {
        match result {
            Ok(creature) => {
                tracing::info!(
                    id = %creature.id,
                    name = creature.display_name(),
                    rare = creature.is_rare,
                    "Encounter"
                );
                let id = creature.id;
                self.announce(&creature);
                self.session.begin(creature);
                if let Err(e) = self.store.increment_encounter_counter() {
                    self.store_failed("count encounter", &e);
                }
                if let Err(e) = self.store.record_encounter(id) {
                    self.store_failed("record encounter", &e);
                }
                self.reload();
            }
            Err(e) => {
                tracing::warn!("Failed to fetch encounter: {e}");
                self.session.current = None;
                self.session.phase = Phase::Idle;
                self.session.last_error = Some(e.to_string());
            }
        }
        self.session.processing = false;
        Step::Settled
    }

    /// Throw at the current creature. The attempt is spent immediately.
    pub fn attempt_capture(&mut self) -> Option<Step> {
        if !self.session.can_throw() {
            tracing::debug!(
                processing = self.session.processing,
                attempts = self.session.attempts,
                "Ignoring throw"
            );
            return None;
        }
        self.session.processing = true;
        self.session.phase = Phase::Throwing;
        self.play(Cue::Throw);
        self.session.attempts = self.session.attempts.saturating_sub(1);
        Some(Step::hold(self.timings.throw, Followup::ResolveThrow))
    }

    pub fn flee(&mut self) -> Option<Step> {
        if !self.session.can_flee() {
            tracing::debug!(processing = self.session.processing, "Ignoring flee");
            return None;
        }
        self.session.processing = true;
        self.session.phase = Phase::Fleeing;
        Some(Step::hold(self.timings.flee, Followup::SettleFlee))
    }

    /// Take a timed edge of the state machine.
    pub fn advance(&mut self, followup: Followup) -> Step {
        match followup {
            Followup::ResolveThrow => self.resolve_throw(),
            Followup::ShowRejection(direction) => {
                self.session.phase = Phase::rejected(direction);
                Step::hold(self.timings.reject, Followup::SettleRejection)
            }
            Followup::SettleRejection => {
                self.session.phase = Phase::Idle;
                self.session.processing = false;
                Step::Settled
            }
            Followup::SettleFlee => {
                self.session.clear();
                Step::hold(self.timings.after_flee, Followup::StartNext)
            }
            Followup::CommitCapture => self.commit_capture(),
            Followup::StartNext => {
                // A player start during the pause already replaced the chain.
                if self.session.current.is_some() {
                    tracing::debug!("Encounter already begun; dropping chained start");
                    return Step::Settled;
                }
                self.start_encounter().unwrap_or(Step::Settled)
            }
        }
    }

    fn resolve_throw(&mut self) -> Step {
        if self.session.current.is_none() {
            self.session.phase = Phase::Idle;
            self.session.processing = false;
            return Step::Settled;
        }

        if roll_capture_success(&mut *self.rng) {
            if self.store.roster_is_full() {
                tracing::info!("Roster full; capture waits for a free slot");
                self.session.deferred = self.session.current.take();
                self.session.phase = Phase::Idle;
                self.session.processing = false;
                return Step::Settled;
            }
            return self.begin_commit();
        }

        self.play(Cue::CaptureFail);
        if self.session.attempts == 0 {
            self.session.phase = Phase::Fleeing;
            return Step::hold(self.timings.flee, Followup::SettleFlee);
        }
        let direction = roll_rejection_direction(&mut *self.rng);
        Step::hold(
            self.timings.reject_lead_in,
            Followup::ShowRejection(direction),
        )
    }

    fn begin_commit(&mut self) -> Step {
        self.session.processing = true;
        self.session.phase = Phase::Capturing;
        self.play(Cue::CaptureSuccess);
        Step::hold(self.timings.capture, Followup::CommitCapture)
    }

    fn commit_capture(&mut self) -> Step {
        if let Some(creature) = self.session.current.take() {
            match self.store.add_to_roster(&creature) {
                Ok(true) => {
                    tracing::info!(id = %creature.id, "Captured");
                    if let Err(e) = self.store.record_capture(creature.id) {
                        self.store_failed("record capture", &e);
                    }
                    if let Err(e) = self.store.increment_capture_counter() {
                        self.store_failed("count capture", &e);
                    }
                }
                Ok(false) => {
                    tracing::warn!(id = %creature.id, "Roster filled before capture committed");
                }
                Err(e) => self.store_failed("add to roster", &e),
            }
            self.reload();
        }
        self.session.clear();
        Step::hold(self.timings.after_capture, Followup::StartNext)
    }

    // Collection management

    /// Release the roster entry at `index`. A waiting deferred capture is
    /// committed into the freed slot.
    pub fn release(&mut self, index: usize) -> Result<Step, StoreError> {
        match self.store.release_from_roster(index) {
            Ok(released) => {
                tracing::info!(id = %released.id, index, "Released");
            }
            Err(e) => {
                tracing::warn!("Release failed: {e}");
                self.session.last_error = Some(e.to_string());
                return Err(e);
            }
        }
        self.reload();

        let Some(creature) = self.session.deferred.take() else {
            return Ok(Step::Settled);
        };
        self.session.current = Some(creature);
        Ok(self.begin_commit())
    }

    /// Discard a deferred capture. Returns whether one was pending.
    pub fn cancel_deferred(&mut self) -> bool {
        let Some(creature) = self.session.deferred.take() else {
            return false;
        };
        tracing::info!(id = %creature.id, "Deferred capture discarded");
        self.session.phase = Phase::Idle;
        self.session.processing = false;
        true
    }

    /// Returns whether `id` is now a favorite.
    pub fn toggle_favorite(&mut self, id: SpeciesId) -> Result<bool, StoreError> {
        let result = self.store.toggle_favorite(id);
        if let Err(e) = &result {
            self.store_failed("toggle favorite", e);
        }
        self.reload();
        result
    }

    // Preferences

    pub fn set_sound_enabled(&mut self, enabled: bool) {
        if let Err(e) = self.store.set_sound_enabled(enabled) {
            self.store_failed("save sound preference", &e);
        }
        self.cues.set_enabled(enabled);
        self.reload();
        self.play(Cue::Click);
    }

    pub fn set_dark_mode(&mut self, enabled: bool) {
        if let Err(e) = self.store.set_dark_mode(enabled) {
            self.store_failed("save dark mode preference", &e);
        }
        self.reload();
        self.play(Cue::Click);
    }

    // Helpers

    /// Cry first; the rare cue waits behind it, or plays at once without one.
    fn announce(&self, creature: &CreatureRecord) {
        match &creature.cry {
            Some(cry) => {
                self.cues.play(&CueIntent::now(Cue::Cry(cry.clone())));
                if creature.is_rare {
                    self.cues.play(&CueIntent::after(
                        Cue::RareEncounter,
                        self.timings.rare_cue_offset,
                    ));
                }
            }
            None if creature.is_rare => self.play(Cue::RareEncounter),
            None => {}
        }
    }

    fn play(&self, cue: Cue) {
        self.cues.play(&CueIntent::now(cue));
    }

    fn store_failed(&mut self, action: &str, error: &StoreError) {
        tracing::warn!("Failed to {action}: {error}");
        self.session.last_error = Some(format!("failed to {action}: {error}"));
    }

    /// Re-read every collection document.
    fn reload(&mut self) {
        let favorites = self.store.favorites();
        let roster = self
            .store
            .roster()
            .into_iter()
            .map(|mut creature| {
                creature.is_favorite = favorites.contains(&creature.id);
                creature
            })
            .collect();
        self.view = CollectionView {
            roster,
            captured: self.store.captured(),
            encountered: self.store.encountered(),
            favorites,
            counters: self.store.counters(),
            sound_enabled: self.store.sound_enabled(),
            dark_mode: self.store.dark_mode(self.dark_mode_default),
        };
    }
}

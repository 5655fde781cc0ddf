use std::collections::BTreeSet;

use serde::Serialize;
use serde::de::DeserializeOwned;

use pokecatch_types::{Counters, CreatureRecord, ROSTER_CAPACITY, SpeciesId};

use crate::{KeyValueStore, StoreError};

/// Persisted document keys.
pub mod keys {
    pub const ROSTER: &str = "pokecatch_captured";
    pub const CAPTURED: &str = "pokecatch_pokedex";
    pub const ENCOUNTERED: &str = "pokecatch_encountered";
    pub const FAVORITES: &str = "pokecatch_favorites";
    pub const COUNTERS: &str = "pokecatch_stats";
    pub const DARK_MODE: &str = "pokecatch_darkmode";
    pub const SOUND: &str = "pokecatch_sound";
}

/// Typed view over a [`KeyValueStore`].
///
/// Ledgers are sets of species ids and are always written sorted and
/// deduplicated. Favorites are kept apart from the roster; roster entries'
/// own `is_favorite` field is never written here.
#[derive(Debug)]
pub struct CollectionStore<S> {
    backend: S,
}

impl<S: KeyValueStore> CollectionStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    pub fn into_inner(self) -> S {
        self.backend
    }

    fn read<T: DeserializeOwned + Default>(&self, key: &'static str) -> T {
        let Some(text) = self.backend.get(key) else {
            return T::default();
        };
        match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, "Ignoring malformed stored document: {e}");
                T::default()
            }
        }
    }

    fn write<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), StoreError> {
        let text = serde_json::to_string(value)
            .map_err(|source| StoreError::Serialize { key, source })?;
        self.backend.set(key, &text)
    }

    fn read_ledger(&self, key: &'static str) -> BTreeSet<SpeciesId> {
        self.read::<Vec<SpeciesId>>(key).into_iter().collect()
    }

    /// Insert `id`; only writes when the ledger actually changes.
    fn add_to_ledger(&mut self, key: &'static str, id: SpeciesId) -> Result<(), StoreError> {
        let mut ledger = self.read_ledger(key);
        if ledger.insert(id) {
            self.write(key, &ledger)?;
        }
        Ok(())
    }

    // Roster

    #[must_use]
    pub fn roster(&self) -> Vec<CreatureRecord> {
        self.read(keys::ROSTER)
    }

    pub fn put_roster(&mut self, roster: &[CreatureRecord]) -> Result<(), StoreError> {
        self.write(keys::ROSTER, roster)
    }

    #[must_use]
    pub fn roster_is_full(&self) -> bool {
        self.roster().len() >= ROSTER_CAPACITY
    }

    /// Append `record` stamped with the current time.
    ///
    /// Returns `Ok(false)` without touching anything when the roster is full.
    pub fn add_to_roster(&mut self, record: &CreatureRecord) -> Result<bool, StoreError> {
        let mut roster = self.roster();
        if roster.len() >= ROSTER_CAPACITY {
            return Ok(false);
        }
        let mut entry = record.clone();
        entry.captured_at = Some(chrono::Utc::now().timestamp_millis());
        roster.push(entry);
        self.put_roster(&roster)?;
        Ok(true)
    }

    /// Remove the entry at ordinal `index`.
    pub fn release_from_roster(&mut self, index: usize) -> Result<CreatureRecord, StoreError> {
        let mut roster = self.roster();
        if index >= roster.len() {
            return Err(StoreError::IndexOutOfRange {
                index,
                len: roster.len(),
            });
        }
        let released = roster.remove(index);
        self.put_roster(&roster)?;
        Ok(released)
    }

    // Ledgers

    /// Captured species, ascending.
    #[must_use]
    pub fn captured(&self) -> BTreeSet<SpeciesId> {
        self.read_ledger(keys::CAPTURED)
    }

    /// Encountered species, ascending.
    #[must_use]
    pub fn encountered(&self) -> BTreeSet<SpeciesId> {
        self.read_ledger(keys::ENCOUNTERED)
    }

    pub fn record_capture(&mut self, id: SpeciesId) -> Result<(), StoreError> {
        self.add_to_ledger(keys::CAPTURED, id)
    }

    pub fn record_encounter(&mut self, id: SpeciesId) -> Result<(), StoreError> {
        self.add_to_ledger(keys::ENCOUNTERED, id)
    }

    // Favorites

    #[must_use]
    pub fn favorites(&self) -> BTreeSet<SpeciesId> {
        self.read_ledger(keys::FAVORITES)
    }

    /// Flip membership of `id`; returns whether it is now a favorite.
    pub fn toggle_favorite(&mut self, id: SpeciesId) -> Result<bool, StoreError> {
        let mut favorites = self.favorites();
        let now_favorite = if favorites.remove(&id) {
            false
        } else {
            favorites.insert(id);
            true
        };
        self.write(keys::FAVORITES, &favorites)?;
        Ok(now_favorite)
    }

    // Counters

    #[must_use]
    pub fn counters(&self) -> Counters {
        self.read(keys::COUNTERS)
    }

    pub fn increment_encounter_counter(&mut self) -> Result<Counters, StoreError> {
        let mut counters = self.counters();
        counters.total_encounters = counters.total_encounters.saturating_add(1);
        self.write(keys::COUNTERS, &counters)?;
        Ok(counters)
    }

    pub fn increment_capture_counter(&mut self) -> Result<Counters, StoreError> {
        let mut counters = self.counters();
        counters.total_captures = counters.total_captures.saturating_add(1);
        self.write(keys::COUNTERS, &counters)?;
        Ok(counters)
    }

    // Preferences

    /// Stored preference, or `system_default` when never set.
    #[must_use]
    pub fn dark_mode(&self, system_default: bool) -> bool {
        self.read::<Option<bool>>(keys::DARK_MODE)
            .unwrap_or(system_default)
    }

    pub fn set_dark_mode(&mut self, enabled: bool) -> Result<(), StoreError> {
        self.write(keys::DARK_MODE, &enabled)
    }

    #[must_use]
    pub fn sound_enabled(&self) -> bool {
        self.read::<Option<bool>>(keys::SOUND).unwrap_or(true)
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) -> Result<(), StoreError> {
        self.write(keys::SOUND, &enabled)
    }
}

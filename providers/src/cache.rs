//! In-memory species cache.
//!
//! Bounded by entry count and age. Only species data is cached; rarity is
//! per-encounter and never stored here.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use pokecatch_types::{SpeciesData, SpeciesId};

pub const DEFAULT_MAX_ENTRIES: usize = 200;
pub const DEFAULT_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    pub max_entries: usize,
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            ttl: DEFAULT_TTL,
        }
    }
}

#[derive(Debug)]
pub struct SpeciesCache {
    config: CacheConfig,
    entries: HashMap<SpeciesId, (SpeciesData, Instant)>,
}

impl SpeciesCache {
    #[must_use]
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            entries: HashMap::new(),
        }
    }

    /// Fresh entry for `id`, dropping it if it has expired.
    pub fn get(&mut self, id: SpeciesId, now: Instant) -> Option<SpeciesData> {
        let (data, stored_at) = self.entries.get(&id)?;
        if now.saturating_duration_since(*stored_at) < self.config.ttl {
            return Some(data.clone());
        }
        self.entries.remove(&id);
        None
    }

    pub fn insert(&mut self, data: SpeciesData, now: Instant) {
        if self.config.max_entries == 0 {
            return;
        }
        if !self.entries.contains_key(&data.id) && self.entries.len() >= self.config.max_entries {
            self.evict_oldest();
        }
        self.entries.insert(data.id, (data, now));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, (_, stored_at))| *stored_at)
            .map(|(id, _)| *id);
        if let Some(id) = oldest {
            self.entries.remove(&id);
        }
    }
}

impl Default for SpeciesCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

//! Encounter gateway.
//!
//! Turns a [`SpeciesSource`] into an [`EncounterSource`]: draws a uniformly
//! random species id, reads species data through the cache, and decorates it
//! with a rarity flag rolled for this encounter only.

use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use futures_util::future::{BoxFuture, FutureExt};

use pokecatch_types::{
    CreatureRecord, GENERATION_SIZE, RARITY_ODDS, RandomSource, SpeciesData, SpeciesId,
    ThreadRandom,
};

use crate::cache::{CacheConfig, SpeciesCache};
use crate::{EncounterSource, ProviderError, SpeciesSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Species ids are drawn from `1..=generation_size`.
    pub generation_size: u16,
    /// One in `rarity_odds` encounters is rare. Zero disables rarity.
    pub rarity_odds: u32,
    pub cache: CacheConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            generation_size: GENERATION_SIZE,
            rarity_odds: RARITY_ODDS,
            cache: CacheConfig::default(),
        }
    }
}

/// Uniform species id in `1..=generation_size`.
pub fn draw_species_id(rng: &mut dyn RandomSource, generation_size: u16) -> SpeciesId {
    let size = generation_size.max(1);
    let index = (rng.next_unit() * f64::from(size)).floor() as u16;
    SpeciesId::new(index.saturating_add(1).min(size))
}

/// Bernoulli draw with probability `1 / odds`.
pub fn roll_rarity(rng: &mut dyn RandomSource, odds: u32) -> bool {
    if odds == 0 {
        return false;
    }
    rng.next_unit() < 1.0 / f64::from(odds)
}

pub struct EncounterGateway<S> {
    source: S,
    config: GatewayConfig,
    rng: Mutex<Box<dyn RandomSource>>,
    cache: Mutex<SpeciesCache>,
}

impl<S: SpeciesSource> EncounterGateway<S> {
    pub fn new(source: S, config: GatewayConfig) -> Self {
        Self::with_random(source, config, Box::new(ThreadRandom))
    }

    pub fn with_random(source: S, config: GatewayConfig, rng: Box<dyn RandomSource>) -> Self {
        Self {
            source,
            config,
            rng: Mutex::new(rng),
            cache: Mutex::new(SpeciesCache::new(config.cache)),
        }
    }

    #[must_use]
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    fn draw_id(&self) -> SpeciesId {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        draw_species_id(&mut **rng, self.config.generation_size)
    }

    fn draw_rarity(&self) -> bool {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        roll_rarity(&mut **rng, self.config.rarity_odds)
    }

    fn cached(&self, id: SpeciesId) -> Option<SpeciesData> {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id, Instant::now())
    }

    fn remember(&self, data: &SpeciesData) {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(data.clone(), Instant::now());
    }

    /// Encounter a specific species. Rarity is rolled even on a cache hit.
    pub async fn fetch_encounter(&self, id: SpeciesId) -> Result<CreatureRecord, ProviderError> {
        let data = if let Some(data) = self.cached(id) {
            tracing::debug!(%id, "Species cache hit");
            data
        } else {
            let data = self.source.fetch_species(id).await?;
            self.remember(&data);
            data
        };

        let is_rare = self.draw_rarity();
        if is_rare {
            tracing::info!(%id, "Rare encounter");
        }
        Ok(CreatureRecord::encounter(data, is_rare))
    }

    pub async fn fetch_random_encounter(&self) -> Result<CreatureRecord, ProviderError> {
        let id = self.draw_id();
        self.fetch_encounter(id).await
    }
}

impl<S: SpeciesSource> EncounterSource for EncounterGateway<S> {
    fn next_encounter(&self) -> BoxFuture<'_, Result<CreatureRecord, ProviderError>> {
        self.fetch_random_encounter().boxed()
    }
}

//! Creature records as produced by the gateway and persisted in the roster.

use serde::{Deserialize, Serialize};

use crate::{CreatureType, SpeciesId};

/// Species data as returned by the provider, before any per-encounter
/// decoration. This is the unit the gateway caches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeciesData {
    pub id: SpeciesId,
    pub name: String,
    pub localized_name: String,
    pub sprite: String,
    pub sprite_rare: String,
    pub types: Vec<CreatureType>,
    pub cry: Option<String>,
}

/// One encountered (and possibly captured) creature instance.
///
/// `is_rare` is rolled once when the instance is created and never changes
/// afterwards; two instances of the same species can differ.
///
/// Field names follow the persisted roster layout. Aliases accept rosters
/// written by earlier releases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatureRecord {
    pub id: SpeciesId,
    pub name: String,
    #[serde(alias = "nameFr")]
    pub localized_name: String,
    pub sprite: String,
    #[serde(alias = "spriteShiny")]
    pub sprite_rare: String,
    pub types: Vec<CreatureType>,
    #[serde(alias = "isShiny")]
    pub is_rare: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cry: Option<String>,
    #[serde(default)]
    pub is_favorite: bool,
    /// Capture time in milliseconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captured_at: Option<i64>,
}

impl CreatureRecord {
    /// Decorate species data with a rarity flag, producing a fresh instance.
    #[must_use]
    pub fn encounter(data: SpeciesData, is_rare: bool) -> Self {
        let localized_name = if data.localized_name.trim().is_empty() {
            data.name.clone()
        } else {
            data.localized_name
        };
        Self {
            id: data.id,
            name: data.name,
            localized_name,
            sprite: data.sprite,
            sprite_rare: data.sprite_rare,
            types: data.types,
            is_rare,
            cry: data.cry,
            is_favorite: false,
            captured_at: None,
        }
    }

    /// Localized name, or the canonical name when no localization exists.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.localized_name.is_empty() {
            &self.name
        } else {
            &self.localized_name
        }
    }

    /// Sprite matching this instance's rarity.
    #[must_use]
    pub fn sprite_url(&self) -> &str {
        if self.is_rare {
            &self.sprite_rare
        } else {
            &self.sprite
        }
    }

    #[must_use]
    pub fn is_captured(&self) -> bool {
        self.captured_at.is_some()
    }
}

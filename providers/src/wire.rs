//! PokeAPI response payloads.
//!
//! Only the fields the game reads are modelled; everything else in the
//! (large) upstream documents is ignored by serde.

use serde::Deserialize;

use pokecatch_types::{CreatureType, SpeciesData, SpeciesId, SpeciesIdError};

/// `GET /pokemon/{id}`
#[derive(Debug, Deserialize)]
pub(crate) struct PokemonResponse {
    pub id: u32,
    pub name: String,
    pub sprites: Sprites,
    #[serde(default)]
    pub types: Vec<TypeSlot>,
    #[serde(default)]
    pub cries: Option<Cries>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Sprites {
    pub front_default: Option<String>,
    pub front_shiny: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TypeSlot {
    #[serde(default)]
    pub slot: u8,
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NamedResource {
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Cries {
    pub latest: Option<String>,
    pub legacy: Option<String>,
}

/// `GET /pokemon-species/{id}`
#[derive(Debug, Deserialize)]
pub(crate) struct SpeciesResponse {
    #[serde(default)]
    pub names: Vec<LocalizedName>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LocalizedName {
    pub language: NamedResource,
    pub name: String,
}

impl SpeciesResponse {
    pub fn name_for(&self, locale: &str) -> Option<&str> {
        self.names
            .iter()
            .find(|entry| entry.language.name.eq_ignore_ascii_case(locale))
            .map(|entry| entry.name.as_str())
            .filter(|name| !name.trim().is_empty())
    }
}

impl PokemonResponse {
    /// Convert into domain data; `localized_name` of `None` means "use the
    /// canonical name".
    pub fn into_species(
        self,
        localized_name: Option<String>,
    ) -> Result<SpeciesData, SpeciesIdError> {
        let id = SpeciesId::checked(self.id, u16::MAX)?;

        let mut slots = self.types;
        slots.sort_by_key(|slot| slot.slot);
        let types = slots
            .into_iter()
            .map(|slot| CreatureType::from(slot.kind.name))
            .collect();

        let cry = self
            .cries
            .and_then(|cries| cries.latest.or(cries.legacy))
            .filter(|url| !url.is_empty());

        Ok(SpeciesData {
            id,
            localized_name: localized_name.unwrap_or_else(|| self.name.clone()),
            name: self.name,
            sprite: self.sprites.front_default.unwrap_or_default(),
            sprite_rare: self.sprites.front_shiny.unwrap_or_default(),
            types,
            cry,
        })
    }
}

//! Elemental type tags and their display names.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A creature's type tag as reported by the provider.
///
/// Unknown tags are preserved verbatim so that a newer provider schema never
/// fails a fetch or a roster load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CreatureType {
    Normal,
    Fire,
    Water,
    Electric,
    Grass,
    Ice,
    Fighting,
    Poison,
    Ground,
    Flying,
    Psychic,
    Bug,
    Rock,
    Ghost,
    Dragon,
    Dark,
    Steel,
    Fairy,
    Other(String),
}

impl CreatureType {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Normal => "normal",
            Self::Fire => "fire",
            Self::Water => "water",
            Self::Electric => "electric",
            Self::Grass => "grass",
            Self::Ice => "ice",
            Self::Fighting => "fighting",
            Self::Poison => "poison",
            Self::Ground => "ground",
            Self::Flying => "flying",
            Self::Psychic => "psychic",
            Self::Bug => "bug",
            Self::Rock => "rock",
            Self::Ghost => "ghost",
            Self::Dragon => "dragon",
            Self::Dark => "dark",
            Self::Steel => "steel",
            Self::Fairy => "fairy",
            Self::Other(tag) => tag,
        }
    }

    /// Display name for `locale`, falling back to the canonical tag.
    #[must_use]
    pub fn display_name(&self, locale: &str) -> &str {
        if locale.eq_ignore_ascii_case("fr")
            && let Some(name) = self.french_name()
        {
            return name;
        }
        self.as_str()
    }

    fn french_name(&self) -> Option<&'static str> {
        let name = match self {
            Self::Normal => "Normal",
            Self::Fire => "Feu",
            Self::Water => "Eau",
            Self::Electric => "Électrik",
            Self::Grass => "Plante",
            Self::Ice => "Glace",
            Self::Fighting => "Combat",
            Self::Poison => "Poison",
            Self::Ground => "Sol",
            Self::Flying => "Vol",
            Self::Psychic => "Psy",
            Self::Bug => "Insecte",
            Self::Rock => "Roche",
            Self::Ghost => "Spectre",
            Self::Dragon => "Dragon",
            Self::Dark => "Ténèbres",
            Self::Steel => "Acier",
            Self::Fairy => "Fée",
            Self::Other(_) => return None,
        };
        Some(name)
    }
}

impl From<String> for CreatureType {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "normal" => Self::Normal,
            "fire" => Self::Fire,
            "water" => Self::Water,
            "electric" => Self::Electric,
            "grass" => Self::Grass,
            "ice" => Self::Ice,
            "fighting" => Self::Fighting,
            "poison" => Self::Poison,
            "ground" => Self::Ground,
            "flying" => Self::Flying,
            "psychic" => Self::Psychic,
            "bug" => Self::Bug,
            "rock" => Self::Rock,
            "ghost" => Self::Ghost,
            "dragon" => Self::Dragon,
            "dark" => Self::Dark,
            "steel" => Self::Steel,
            "fairy" => Self::Fairy,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for CreatureType {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<CreatureType> for String {
    fn from(value: CreatureType) -> Self {
        match value {
            CreatureType::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for CreatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

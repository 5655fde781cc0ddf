use std::fmt;

use thiserror::Error;

/// Stable numeric identifier for a creature kind (not per-instance).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct SpeciesId(u16);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("species id {value} is outside 1..={max}")]
pub struct SpeciesIdError {
    pub value: u32,
    pub max: u16,
}

impl SpeciesId {
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Validate `value` against a generation of `generation_size` species.
    pub fn checked(value: u32, generation_size: u16) -> Result<Self, SpeciesIdError> {
        match u16::try_from(value) {
            Ok(id) if id >= 1 && id <= generation_size => Ok(Self(id)),
            _ => Err(SpeciesIdError {
                value,
                max: generation_size,
            }),
        }
    }

    #[must_use]
    pub const fn value(self) -> u16 {
        self.0
    }

    /// Zero-padded dex number, e.g. `#025`.
    #[must_use]
    pub fn dex_number(self) -> String {
        format!("#{:03}", self.0)
    }
}

impl fmt::Display for SpeciesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

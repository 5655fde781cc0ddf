//! Persistent collection state.
//!
//! [`CollectionStore`] owns the player's roster, the captured and encountered
//! ledgers, the favorites set, lifetime counters, and two preference flags.
//! It sits on a [`KeyValueStore`]: one JSON document per key.
//!
//! Reads are fail-soft. A missing or malformed document reads as that
//! structure's empty value and is logged, never returned as an error. Writes
//! do return errors so callers can decide whether to surface them.

mod collection;
mod file;

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub use collection::{CollectionStore, keys};
pub use file::FileStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to serialize {key}: {source}")]
    Serialize {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("no roster entry at position {index} (roster holds {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Minimal string key-value persistence.
pub trait KeyValueStore: Send {
    /// `None` when the key is absent or cannot be read.
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Volatile backend for tests and for running without a data directory.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

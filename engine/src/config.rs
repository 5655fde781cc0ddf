use serde::Deserialize;
use std::{env, path::Path, path::PathBuf, time::Duration};

use pokecatch_providers::cache::{self, CacheConfig};
use pokecatch_providers::pokeapi::{DEFAULT_LOCALE, POKEAPI_BASE_URL};
use pokecatch_providers::retry::RetryConfig;
use pokecatch_providers::{GatewayConfig, PokeApiConfig, ProviderError};
use pokecatch_types::{GENERATION_SIZE, RARITY_ODDS};

use crate::state::PhaseTimings;

pub const API_URL_ENV: &str = "POKECATCH_API_URL";
pub const DATA_DIR_ENV: &str = "POKECATCH_DATA_DIR";

const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Default, Deserialize)]
pub struct GameConfig {
    pub app: Option<AppConfig>,
    pub provider: Option<ProviderConfig>,
    pub game: Option<RulesConfig>,
    pub timings: Option<TimingsConfig>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub fn path(&self) -> &PathBuf {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Zero every phase hold.
    #[serde(default)]
    pub reduced_motion: bool,
    /// Where collection documents live. Defaults to the platform data dir.
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProviderConfig {
    pub base_url: Option<String>,
    /// Language code for display names, e.g. `fr`.
    pub locale: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub max_retries: Option<u32>,
    pub cache_entries: Option<usize>,
    pub cache_ttl_hours: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RulesConfig {
    pub generation_size: Option<u16>,
    pub rarity_odds: Option<u32>,
}

/// Hold overrides in milliseconds.
#[derive(Debug, Default, Deserialize)]
pub struct TimingsConfig {
    pub throw_ms: Option<u64>,
    pub capture_ms: Option<u64>,
    pub flee_ms: Option<u64>,
    pub reject_ms: Option<u64>,
    pub reject_lead_in_ms: Option<u64>,
    pub after_capture_ms: Option<u64>,
    pub after_flee_ms: Option<u64>,
    pub rare_cue_offset_ms: Option<u64>,
}

impl GameConfig {
    /// `Ok(None)` when there is no config file.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let Some(path) = config_path() else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }
        Self::load_from(&path).map(Some)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(config),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    #[must_use]
    pub fn reduced_motion(&self) -> bool {
        self.app.as_ref().is_some_and(|app| app.reduced_motion)
    }

    /// `POKECATCH_DATA_DIR` wins over `[app] data_dir`.
    #[must_use]
    pub fn data_dir(&self) -> Option<PathBuf> {
        env_value(DATA_DIR_ENV)
            .map(PathBuf::from)
            .or_else(|| self.app.as_ref().and_then(|app| app.data_dir.clone()))
    }

    /// Language used for creature and type names.
    #[must_use]
    pub fn locale(&self) -> String {
        self.provider
            .as_ref()
            .and_then(|p| p.locale.clone())
            .unwrap_or_else(|| DEFAULT_LOCALE.to_string())
    }

    #[must_use]
    pub fn generation_size(&self) -> u16 {
        self.game
            .as_ref()
            .and_then(|game| game.generation_size)
            .filter(|size| *size > 0)
            .unwrap_or(GENERATION_SIZE)
    }

    #[must_use]
    pub fn rarity_odds(&self) -> u32 {
        self.game
            .as_ref()
            .and_then(|game| game.rarity_odds)
            .unwrap_or(RARITY_ODDS)
    }

    #[must_use]
    pub fn timings(&self) -> PhaseTimings {
        if self.reduced_motion() {
            return PhaseTimings::instant();
        }
        let defaults = PhaseTimings::default();
        let Some(t) = self.timings.as_ref() else {
            return defaults;
        };
        let ms = |value: Option<u64>, default: Duration| value.map_or(default, Duration::from_millis);
        PhaseTimings {
            throw: ms(t.throw_ms, defaults.throw),
            capture: ms(t.capture_ms, defaults.capture),
            flee: ms(t.flee_ms, defaults.flee),
            reject: ms(t.reject_ms, defaults.reject),
            reject_lead_in: ms(t.reject_lead_in_ms, defaults.reject_lead_in),
            after_capture: ms(t.after_capture_ms, defaults.after_capture),
            after_flee: ms(t.after_flee_ms, defaults.after_flee),
            rare_cue_offset: ms(t.rare_cue_offset_ms, defaults.rare_cue_offset),
        }
    }

    #[must_use]
    pub fn gateway_config(&self) -> GatewayConfig {
        let provider = self.provider.as_ref();
        let cache = CacheConfig {
            max_entries: provider
                .and_then(|p| p.cache_entries)
                .unwrap_or(cache::DEFAULT_MAX_ENTRIES),
            ttl: provider
                .and_then(|p| p.cache_ttl_hours)
                .map_or(cache::DEFAULT_TTL, |hours| {
                    Duration::from_secs(hours.saturating_mul(3600))
                }),
        };
        GatewayConfig {
            generation_size: self.generation_size(),
            rarity_odds: self.rarity_odds(),
            cache,
        }
    }

    /// `POKECATCH_API_URL` wins over `[provider] base_url`.
    pub fn pokeapi_config(&self) -> Result<PokeApiConfig, ProviderError> {
        let provider = self.provider.as_ref();
        let base_url = env_value(API_URL_ENV)
            .or_else(|| provider.and_then(|p| p.base_url.clone()))
            .unwrap_or_else(|| POKEAPI_BASE_URL.to_string());
        let timeout = provider
            .and_then(|p| p.timeout_seconds)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let mut retry = RetryConfig::default();
        if let Some(max_retries) = provider.and_then(|p| p.max_retries) {
            retry.max_retries = max_retries;
        }

        Ok(PokeApiConfig::new(&base_url)?
            .with_locale(self.locale())
            .with_timeout(Duration::from_secs(timeout))
            .with_retry(retry))
    }
}

fn env_value(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".pokecatch").join("config.toml"))
}

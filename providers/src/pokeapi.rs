//! PokeAPI client.
//!
//! Two endpoints per species, fetched concurrently:
//!
//! | Endpoint | Failure handling |
//! |----------|------------------|
//! | `GET {base}/pokemon/{id}` | Hard failure for the whole fetch |
//! | `GET {base}/pokemon-species/{id}` | Degrades to the canonical name |

use std::time::Duration;

use futures_util::future::{BoxFuture, FutureExt, join};
use url::Url;

use pokecatch_types::{SpeciesData, SpeciesId};

use crate::retry::{RetryConfig, RetryOutcome, send_with_retry};
use crate::wire::{PokemonResponse, SpeciesResponse};
use crate::{ProviderError, SpeciesSource, http_client_with_timeout, read_capped_error_body};

/// Canonical PokeAPI v2 base URL.
pub const POKEAPI_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// Locale used for display names unless configured otherwise.
pub const DEFAULT_LOCALE: &str = "fr";

const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct PokeApiConfig {
    base_url: Url,
    locale: String,
    timeout: Duration,
    retry: RetryConfig,
}

impl Default for PokeApiConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(POKEAPI_BASE_URL).unwrap_or_else(|_| unreachable!()),
            locale: DEFAULT_LOCALE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retry: RetryConfig::default(),
        }
    }
}

impl PokeApiConfig {
    pub fn new(base_url: &str) -> Result<Self, ProviderError> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
            ..Self::default()
        })
    }

    #[must_use]
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn locale(&self) -> &str {
        &self.locale
    }

    fn endpoint(&self, resource: &str, id: SpeciesId) -> String {
        format!(
            "{}/{resource}/{id}",
            self.base_url.as_str().trim_end_matches('/')
        )
    }
}

#[derive(Debug, Clone)]
pub struct PokeApiClient {
    http: reqwest::Client,
    config: PokeApiConfig,
}

impl PokeApiClient {
    pub fn new(config: PokeApiConfig) -> Result<Self, ProviderError> {
        let http = http_client_with_timeout(config.timeout).map_err(ProviderError::Client)?;
        Ok(Self { http, config })
    }

    #[must_use]
    pub fn config(&self) -> &PokeApiConfig {
        &self.config
    }

    /// Fetch the species record and its localized name concurrently.
    pub async fn fetch(&self, id: SpeciesId) -> Result<SpeciesData, ProviderError> {
        let (record, localized) = join(self.fetch_record(id), self.fetch_localized_name(id)).await;
        let record = record?;
        Ok(record.into_species(localized)?)
    }

    async fn fetch_record(&self, id: SpeciesId) -> Result<PokemonResponse, ProviderError> {
        let url = self.config.endpoint("pokemon", id);
        let outcome = send_with_retry(|| self.http.get(&url), &self.config.retry).await;

        match outcome {
            RetryOutcome::Success(response) => {
                response.json().await.map_err(ProviderError::Decode)
            }
            RetryOutcome::HttpError(response) => {
                let status = response.status().as_u16();
                let body = read_capped_error_body(response).await;
                Err(ProviderError::Status { status, url, body })
            }
            RetryOutcome::ConnectionError { attempts, source } => {
                Err(ProviderError::Transport { attempts, source })
            }
        }
    }

    /// `None` on any failure; localization is never fatal.
    async fn fetch_localized_name(&self, id: SpeciesId) -> Option<String> {
        let url = self.config.endpoint("pokemon-species", id);
        let outcome = send_with_retry(|| self.http.get(&url), &self.config.retry).await;

        let RetryOutcome::Success(response) = outcome else {
            tracing::debug!(%id, "Localized name unavailable; using canonical name");
            return None;
        };

        match response.json::<SpeciesResponse>().await {
            Ok(species) => species.name_for(&self.config.locale).map(str::to_string),
            Err(e) => {
                tracing::debug!(%id, %e, "Failed to decode species document");
                None
            }
        }
    }
}

impl SpeciesSource for PokeApiClient {
    fn fetch_species(&self, id: SpeciesId) -> BoxFuture<'_, Result<SpeciesData, ProviderError>> {
        self.fetch(id).boxed()
    }
}

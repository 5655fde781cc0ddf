//! Creature data providers.
//!
//! # Architecture
//!
//! - [`pokeapi`] - HTTP client for the public PokeAPI (species record plus
//!   localized name)
//! - [`cache`] - Bounded, time-limited cache of fetched species
//! - [`gateway`] - [`EncounterGateway`]: picks a random species, consults the
//!   cache, and decorates the result with a freshly rolled rarity flag
//! - [`retry`] - Backoff policy shared by every request
//!
//! The engine only sees [`EncounterSource`]; tests substitute their own.
//!
//! # Error Handling
//!
//! Every failure surfaces as [`ProviderError`]. Transient HTTP failures are
//! retried inside [`retry::send_with_retry`] before an error is returned, so
//! callers should not retry again on their own.

pub mod cache;
pub mod gateway;
pub mod pokeapi;
pub mod retry;
mod wire;

use std::time::Duration;

use futures_util::future::BoxFuture;
use thiserror::Error;

pub use pokecatch_types;
use pokecatch_types::{CreatureRecord, SpeciesData, SpeciesId, SpeciesIdError};

pub use cache::{CacheConfig, SpeciesCache};
pub use gateway::{EncounterGateway, GatewayConfig};
pub use pokeapi::{PokeApiClient, PokeApiConfig};

const CONNECT_TIMEOUT_SECS: u64 = 10;
const TCP_KEEPALIVE_SECS: u64 = 60;
const POOL_IDLE_TIMEOUT_SECS: u64 = 90;

/// Error bodies are only kept for diagnostics.
const MAX_ERROR_BODY_BYTES: usize = 4 * 1024;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed after {attempts} attempt(s): {source}")]
    Transport {
        attempts: u32,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}: {body}")]
    Status {
        status: u16,
        url: String,
        body: String,
    },
    #[error("failed to decode provider response: {0}")]
    Decode(#[source] reqwest::Error),
    #[error(transparent)]
    InvalidSpecies(#[from] SpeciesIdError),
    #[error("invalid provider URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Fetches raw species data by id.
pub trait SpeciesSource: Send + Sync {
    fn fetch_species(&self, id: SpeciesId) -> BoxFuture<'_, Result<SpeciesData, ProviderError>>;
}

/// Produces the next creature to encounter.
pub trait EncounterSource: Send + Sync {
    fn next_encounter(&self) -> BoxFuture<'_, Result<CreatureRecord, ProviderError>>;
}

fn base_client_builder() -> reqwest::ClientBuilder {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .tcp_keepalive(Some(Duration::from_secs(TCP_KEEPALIVE_SECS)))
        .pool_idle_timeout(Some(Duration::from_secs(POOL_IDLE_TIMEOUT_SECS)))
        .user_agent(concat!("pokecatch/", env!("CARGO_PKG_VERSION")))
}

pub fn http_client_with_timeout(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    base_client_builder().timeout(timeout).build()
}

/// Read at most [`MAX_ERROR_BODY_BYTES`] of an error response body.
pub async fn read_capped_error_body(response: reqwest::Response) -> String {
    use futures_util::StreamExt;
    let mut body = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let Ok(chunk) = chunk else { break };
        body.extend_from_slice(&chunk);
        if body.len() > MAX_ERROR_BODY_BYTES {
            body.truncate(MAX_ERROR_BODY_BYTES);
            let text = String::from_utf8_lossy(&body);
            return format!("{text}...(truncated)");
        }
    }
    String::from_utf8_lossy(&body).into_owned()
}

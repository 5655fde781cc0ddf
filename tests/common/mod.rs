//! Shared test utilities and fixtures
//!
//! A mock PokeAPI built on wiremock plus helpers for wiring a full session
//! against it.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pokecatch_engine::{MutedCues, Orchestrator, PhaseTimings, SessionHandle, Snapshot};
use pokecatch_providers::cache::CacheConfig;
use pokecatch_providers::retry::RetryConfig;
use pokecatch_providers::{EncounterGateway, GatewayConfig, PokeApiClient, PokeApiConfig};
use pokecatch_store::{CollectionStore, FileStore};
use pokecatch_types::SequenceRandom;

/// Species served by [`mount_generation`]: (id, canonical name, French name, type).
pub const SPECIES: [(u16, &str, &str, &str); 3] = [
    (1, "bulbasaur", "Bulbizarre", "grass"),
    (2, "ivysaur", "Herbizarre", "grass"),
    (3, "venusaur", "Florizarre", "grass"),
];

/// Outcome draws for a successful throw.
pub const SUCCESS: [f64; 2] = [0.0, 0.0];

/// Draw that makes the gateway pick species `id` out of [`SPECIES`].
pub fn species_draw(id: u16) -> f64 {
    (f64::from(id) - 0.5) / SPECIES.len() as f64
}

pub fn pokemon_body(id: u16, name: &str, kind: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "sprites": {
            "front_default": format!("https://img.test/{id}.png"),
            "front_shiny": format!("https://img.test/shiny/{id}.png")
        },
        "types": [{"slot": 1, "type": {"name": kind, "url": "u"}}],
        "cries": {"latest": format!("https://cry.test/{id}.ogg")}
    })
}

pub fn species_body(localized: &str) -> serde_json::Value {
    json!({
        "names": [
            {"language": {"name": "en"}, "name": "ignored"},
            {"language": {"name": "fr"}, "name": localized}
        ]
    })
}

/// Mount both endpoints for one species.
pub async fn mount_species(server: &MockServer, id: u16, name: &str, localized: &str, kind: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/pokemon/{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(pokemon_body(id, name, kind)))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/pokemon-species/{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(species_body(localized)))
        .mount(server)
        .await;
}

/// Mount every entry of [`SPECIES`].
pub async fn mount_generation(server: &MockServer) {
    for (id, name, localized, kind) in SPECIES {
        mount_species(server, id, name, localized, kind).await;
    }
}

pub fn fast_retry() -> RetryConfig {
    RetryConfig {
        max_retries: 2,
        initial_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(5),
        jitter_factor: 0.0,
    }
}

pub fn pokeapi_client(server: &MockServer) -> PokeApiClient {
    let config = PokeApiConfig::new(&server.uri())
        .expect("mock server uri is a valid url")
        .with_locale("fr")
        .with_retry(fast_retry());
    PokeApiClient::new(config).expect("client builds")
}

/// Gateway over the mock generation. Rarity is off when `rarity_odds` is 0.
pub fn gateway(
    server: &MockServer,
    draws: Vec<f64>,
    rarity_odds: u32,
) -> EncounterGateway<PokeApiClient> {
    let config = GatewayConfig {
        generation_size: SPECIES.len() as u16,
        rarity_odds,
        cache: CacheConfig::default(),
    };
    EncounterGateway::with_random(
        pokeapi_client(server),
        config,
        Box::new(SequenceRandom::new(draws)),
    )
}

pub fn file_store(dir: &Path) -> CollectionStore<FileStore> {
    CollectionStore::new(FileStore::new(dir))
}

/// Orchestrator over a file store with instant holds and scripted outcome draws.
pub fn orchestrator(dir: &Path, outcome_draws: Vec<f64>) -> Orchestrator<FileStore> {
    Orchestrator::new(file_store(dir), Arc::new(MutedCues::new()))
        .with_random(Box::new(SequenceRandom::new(outcome_draws)))
        .with_timings(PhaseTimings::instant())
        .with_generation_size(SPECIES.len() as u16)
}

pub async fn wait_until(
    handle: &SessionHandle,
    condition: impl FnMut(&Snapshot) -> bool,
) -> Snapshot {
    let mut rx = handle.snapshots();
    let snapshot = tokio::time::timeout(Duration::from_secs(5), rx.wait_for(condition))
        .await
        .expect("timed out waiting for snapshot")
        .expect("driver stopped")
        .clone();
    snapshot
}

//! Encounter gateway against a mock PokeAPI.

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pokecatch_providers::{EncounterSource, ProviderError};
use pokecatch_types::{CreatureType, SpeciesId};

use crate::common::{gateway, mount_generation, pokemon_body, species_body, species_draw};

#[tokio::test]
async fn random_encounter_builds_localized_record() {
    let server = MockServer::start().await;
    mount_generation(&server).await;

    let gateway = gateway(&server, vec![species_draw(2)], 0);
    let creature = gateway.next_encounter().await.unwrap();

    assert_eq!(creature.id, SpeciesId::new(2));
    assert_eq!(creature.name, "ivysaur");
    assert_eq!(creature.display_name(), "Herbizarre");
    assert_eq!(creature.types, vec![CreatureType::Grass]);
    assert_eq!(creature.cry.as_deref(), Some("https://cry.test/2.ogg"));
    assert!(!creature.is_rare);
    assert!(!creature.is_favorite);
    assert!(creature.captured_at.is_none());
    assert_eq!(creature.sprite_url(), "https://img.test/2.png");
}

#[tokio::test]
async fn repeated_species_is_served_from_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pokemon/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pokemon_body(1, "bulbasaur", "grass")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pokemon-species/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(species_body("Bulbizarre")))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway(&server, vec![species_draw(1)], 0);
    let first = gateway.next_encounter().await.unwrap();
    let second = gateway.next_encounter().await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.display_name(), "Bulbizarre");
}

#[tokio::test]
async fn rare_encounter_uses_rare_sprite() {
    let server = MockServer::start().await;
    mount_generation(&server).await;

    // Odds of one make every draw rare.
    let gateway = gateway(&server, vec![species_draw(3)], 1);
    let creature = gateway.next_encounter().await.unwrap();

    assert!(creature.is_rare);
    assert_eq!(creature.sprite_url(), "https://img.test/shiny/3.png");
}

#[tokio::test]
async fn transient_server_error_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pokemon/1"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    mount_generation(&server).await;

    let gateway = gateway(&server, vec![species_draw(1)], 0);
    let creature = gateway.next_encounter().await.unwrap();
    assert_eq!(creature.name, "bulbasaur");
}

#[tokio::test]
async fn unknown_species_fails_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pokemon/1"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway(&server, vec![species_draw(1)], 0);
    let err = gateway.next_encounter().await.unwrap_err();

    match err {
        ProviderError::Status { status, body, .. } => {
            assert_eq!(status, 404);
            assert_eq!(body, "Not Found");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

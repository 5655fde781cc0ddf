//! Full sessions: mock PokeAPI, gateway, file store and driver together.

use std::sync::Arc;

use wiremock::MockServer;

use pokecatch_engine::{Command, Phase, spawn_session};
use pokecatch_providers::EncounterSource;
use pokecatch_types::SpeciesId;

use crate::common::{
    SUCCESS, file_store, gateway, mount_generation, orchestrator, species_draw, wait_until,
};

#[tokio::test]
async fn capture_is_persisted_and_next_encounter_follows() {
    let server = MockServer::start().await;
    mount_generation(&server).await;
    let dir = tempfile::tempdir().unwrap();

    let source: Arc<dyn EncounterSource> =
        Arc::new(gateway(&server, vec![species_draw(1), species_draw(2)], 0));
    let handle = spawn_session(orchestrator(dir.path(), SUCCESS.to_vec()), source);

    handle.send(Command::Start).await.unwrap();
    let snap = wait_until(&handle, |s| s.current.is_some() && !s.processing).await;
    assert_eq!(snap.current.as_ref().unwrap().display_name(), "Bulbizarre");
    assert_eq!(snap.phase, Phase::Idle);
    assert_eq!(snap.attempts, 3);

    handle.send(Command::Throw).await.unwrap();
    let snap = wait_until(&handle, |s| {
        s.current.as_ref().map(|c| c.id) == Some(SpeciesId::new(2)) && !s.processing
    })
    .await;
    assert_eq!(snap.collection.roster.len(), 1);
    assert_eq!(snap.progress.caught, 1);
    assert_eq!(snap.progress.seen, 2);
    handle.shutdown().await;

    let store = file_store(dir.path());
    let roster = store.roster();
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0].name, "bulbasaur");
    assert_eq!(roster[0].localized_name, "Bulbizarre");
    assert!(roster[0].captured_at.is_some());
    assert_eq!(
        store.captured().into_iter().collect::<Vec<_>>(),
        vec![SpeciesId::new(1)]
    );
    assert_eq!(store.encountered().len(), 2);
    let counters = store.counters();
    assert_eq!(counters.total_encounters, 2);
    assert_eq!(counters.total_captures, 1);
}

#[tokio::test]
async fn collection_survives_restart() {
    let server = MockServer::start().await;
    mount_generation(&server).await;
    let dir = tempfile::tempdir().unwrap();

    {
        let source: Arc<dyn EncounterSource> =
            Arc::new(gateway(&server, vec![species_draw(3)], 0));
        let handle = spawn_session(orchestrator(dir.path(), SUCCESS.to_vec()), source);
        handle.send(Command::Start).await.unwrap();
        wait_until(&handle, |s| s.current.is_some() && !s.processing).await;
        handle.send(Command::ToggleFavorite(SpeciesId::new(3))).await.unwrap();
        handle.send(Command::SetSound(false)).await.unwrap();
        handle.send(Command::Throw).await.unwrap();
        wait_until(&handle, |s| s.collection.roster.len() == 1).await;
        handle.shutdown().await;
    }

    let source: Arc<dyn EncounterSource> = Arc::new(gateway(&server, vec![species_draw(1)], 0));
    let handle = spawn_session(orchestrator(dir.path(), SUCCESS.to_vec()), source);
    let snap = handle.latest();

    assert!(snap.current.is_none());
    assert_eq!(snap.collection.roster.len(), 1);
    assert!(snap.collection.roster[0].is_favorite);
    assert!(!snap.collection.sound_enabled);
    assert!(snap.collection.captured.contains(&SpeciesId::new(3)));
    handle.shutdown().await;
}

#[tokio::test]
async fn provider_outage_leaves_session_retryable() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    let source: Arc<dyn EncounterSource> = Arc::new(gateway(&server, vec![species_draw(1)], 0));
    let handle = spawn_session(orchestrator(dir.path(), SUCCESS.to_vec()), source);

    handle.send(Command::Start).await.unwrap();
    let snap = wait_until(&handle, |s| s.last_error.is_some() && !s.processing).await;
    assert!(snap.current.is_none());
    assert_eq!(snap.collection.counters.total_encounters, 0);

    mount_generation(&server).await;
    handle.send(Command::Start).await.unwrap();
    let snap = wait_until(&handle, |s| s.current.is_some() && !s.processing).await;
    assert!(snap.last_error.is_none());
    assert_eq!(snap.collection.counters.total_encounters, 1);
    handle.shutdown().await;
}

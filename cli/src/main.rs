//! pokecatch CLI - binary entry point and line-oriented play loop.
//!
//! # Architecture
//!
//! The CLI is the composition root. It builds the provider chain, the
//! collection store and the cue sink, hands them to a
//! [`pokecatch_engine::Orchestrator`], and spawns the session driver.
//!
//! ```text
//! stdin lines -> input::parse -> SessionHandle::send
//!                                      |
//!                                      v
//!                      driver task (holds, fetches, guards)
//!                                      |
//!                                      v
//! stdout      <- Renderer::frame <- watch::Receiver<Snapshot>
//! ```
//!
//! The status line is reprinted whenever the snapshot changes. Read-only
//! views (`team`, `dex`, `stats`) render the latest snapshot on demand.

mod cues;
mod input;
mod render;

use anyhow::{Context, Result};
use std::{
    env,
    fs::{self, OpenOptions},
    path::PathBuf,
    sync::{Arc, Mutex},
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use pokecatch_engine::pokecatch_providers::{
    EncounterGateway, EncounterSource, PokeApiClient,
};
use pokecatch_engine::pokecatch_store::{CollectionStore, FileStore};
use pokecatch_engine::{Command, GameConfig, Orchestrator, SessionHandle, spawn_session};

use crate::cues::TerminalCues;
use crate::input::Input;
use crate::render::Renderer;

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (log_file, init_warnings) = open_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // No log file means no logs; stdout belongs to the game.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_log_file() -> (Option<(PathBuf, std::fs::File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in log_file_candidates() {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&candidate)
        {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!(
                    "Failed to open log file {}: {e}",
                    candidate.display()
                ));
            }
        }
    }

    (None, warnings)
}

fn log_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    // Primary: ~/.pokecatch/logs/pokecatch.log
    if let Some(config_path) = GameConfig::path()
        && let Some(config_dir) = config_path.parent()
    {
        candidates.push(config_dir.join("logs").join("pokecatch.log"));
    }

    // Fallback: ./.pokecatch/logs/pokecatch.log
    candidates.push(PathBuf::from(".pokecatch").join("logs").join("pokecatch.log"));

    candidates
}

fn data_dir(config: &GameConfig) -> PathBuf {
    config
        .data_dir()
        .or_else(|| dirs::data_local_dir().map(|dir| dir.join("pokecatch")))
        .unwrap_or_else(|| PathBuf::from(".pokecatch").join("data"))
}

/// Ambient theme hint from `COLORFGBG` (`fg;bg`), dark when the background
/// is one of the low ANSI colors.
fn terminal_prefers_dark() -> bool {
    env::var("COLORFGBG")
        .ok()
        .and_then(|value| background_is_dark(&value))
        .unwrap_or(false)
}

fn background_is_dark(colorfgbg: &str) -> Option<bool> {
    let background: u8 = colorfgbg.rsplit(';').next()?.trim().parse().ok()?;
    Some(background < 7 || background == 8)
}

fn build_session(config: &GameConfig) -> Result<SessionHandle> {
    let client = PokeApiClient::new(config.pokeapi_config()?)
        .context("failed to build PokeAPI client")?;
    let source: Arc<dyn EncounterSource> =
        Arc::new(EncounterGateway::new(client, config.gateway_config()));

    let dir = data_dir(config);
    tracing::info!(dir = %dir.display(), "Collection store");
    let store = CollectionStore::new(FileStore::new(dir));

    let orchestrator = Orchestrator::new(store, Arc::new(TerminalCues::new()))
        .with_timings(config.timings())
        .with_generation_size(config.generation_size())
        .with_dark_mode_default(terminal_prefers_dark());

    Ok(spawn_session(orchestrator, source))
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = GameConfig::load().ok().flatten().unwrap_or_default();
    let session = build_session(&config)?;
    let mut renderer = Renderer::new(config.locale());

    println!("pokecatch - type `help` for commands.");
    let result = play(&session, &mut renderer).await;

    session.shutdown().await;
    result
}

async fn play(session: &SessionHandle, renderer: &mut Renderer) -> Result<()> {
    let mut snapshots = session.snapshots();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    session.send(Command::Start).await?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    break;
                };
                match input::parse(&line) {
                    Input::Command(command) => session.send(command).await?,
                    Input::Show(view) => println!("{}", renderer.view(view, &session.latest())),
                    Input::Quit => break,
                    Input::Empty => {}
                    Input::Invalid(message) => println!("{message}"),
                }
            }
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = snapshots.borrow_and_update().clone();
                if let Some(status) = renderer.frame(&snapshot) {
                    println!("{status}");
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    Ok(())
}

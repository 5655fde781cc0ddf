//! Async session driver.
//!
//! One tokio task owns the [`Orchestrator`]. It multiplexes player commands
//! against the holds and fetches the orchestrator asked for, and publishes a
//! [`Snapshot`] after every change. Because only this task touches the
//! orchestrator, a command that arrives mid-phase simply meets the
//! `processing` guard.

use std::sync::Arc;

use futures_util::StreamExt;
use futures_util::future::{BoxFuture, FutureExt};
use futures_util::stream::FuturesUnordered;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use pokecatch_providers::{EncounterSource, ProviderError};
use pokecatch_store::KeyValueStore;
use pokecatch_types::{CreatureRecord, SpeciesId};

use crate::orchestrator::{Orchestrator, Snapshot};
use crate::state::{Followup, Step};

const COMMAND_BUFFER: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Throw,
    Flee,
    /// Zero-based roster position.
    Release(usize),
    ToggleFavorite(SpeciesId),
    CancelDeferred,
    SetSound(bool),
    SetDarkMode(bool),
    Shutdown,
}

#[derive(Debug, thiserror::Error)]
#[error("session driver has stopped")]
pub struct DriverClosed;

/// Work the driver is waiting on.
enum Fired {
    Hold(Followup),
    Fetched(Result<CreatureRecord, ProviderError>),
}

/// Front-end side of a running session.
#[derive(Debug)]
pub struct SessionHandle {
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<Snapshot>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    pub async fn send(&self, command: Command) -> Result<(), DriverClosed> {
        self.commands.send(command).await.map_err(|_| DriverClosed)
    }

    /// A receiver already holding the latest snapshot.
    #[must_use]
    pub fn snapshots(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.clone()
    }

    #[must_use]
    pub fn latest(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    /// Stop the driver and wait for it to exit. Pending holds are dropped.
    pub async fn shutdown(self) {
        if self.commands.send(Command::Shutdown).await.is_err() {
            tracing::debug!("Session driver already stopped");
        }
        if let Err(e) = self.task.await {
            tracing::warn!("Session driver task failed: {e}");
        }
    }
}

/// Spawn the driver on the current tokio runtime.
pub fn spawn_session<S>(
    orchestrator: Orchestrator<S>,
    source: Arc<dyn EncounterSource>,
) -> SessionHandle
where
    S: KeyValueStore + 'static,
{
    let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
    let (snapshot_tx, snapshot_rx) = watch::channel(orchestrator.snapshot());
    let task = tokio::spawn(run(orchestrator, source, command_rx, snapshot_tx));
    SessionHandle {
        commands: command_tx,
        snapshots: snapshot_rx,
        task,
    }
}

async fn run<S: KeyValueStore>(
    mut orchestrator: Orchestrator<S>,
    source: Arc<dyn EncounterSource>,
    mut commands: mpsc::Receiver<Command>,
    snapshots: watch::Sender<Snapshot>,
) {
    let mut pending: FuturesUnordered<BoxFuture<'static, Fired>> = FuturesUnordered::new();

    loop {
        let step = tokio::select! {
            command = commands.recv() => {
                let Some(command) = command else { break };
                if command == Command::Shutdown {
                    break;
                }
                tracing::debug!(?command, "Command");
                apply(&mut orchestrator, command)
            }
            Some(fired) = pending.next(), if !pending.is_empty() => {
                Some(match fired {
                    Fired::Hold(followup) => orchestrator.advance(followup),
                    Fired::Fetched(result) => orchestrator.encounter_fetched(result),
                })
            }
        };

        if let Some(step) = step {
            schedule(step, &mut pending, &source);
        }
        snapshots.send_replace(orchestrator.snapshot());
    }

    tracing::debug!(pending = pending.len(), "Session driver stopped");
}

fn apply<S: KeyValueStore>(orchestrator: &mut Orchestrator<S>, command: Command) -> Option<Step> {
    match command {
        Command::Start => orchestrator.start_encounter(),
        Command::Throw => orchestrator.attempt_capture(),
        Command::Flee => orchestrator.flee(),
        // Failures are already recorded on the session.
        Command::Release(index) => orchestrator.release(index).ok(),
        Command::ToggleFavorite(id) => {
            if let Ok(now_favorite) = orchestrator.toggle_favorite(id) {
                tracing::debug!(%id, now_favorite, "Favorite toggled");
            }
            None
        }
        Command::CancelDeferred => {
            orchestrator.cancel_deferred();
            None
        }
        Command::SetSound(enabled) => {
            orchestrator.set_sound_enabled(enabled);
            None
        }
        Command::SetDarkMode(enabled) => {
            orchestrator.set_dark_mode(enabled);
            None
        }
        Command::Shutdown => None,
    }
}

fn schedule(
    step: Step,
    pending: &mut FuturesUnordered<BoxFuture<'static, Fired>>,
    source: &Arc<dyn EncounterSource>,
) {
    match step {
        Step::Settled => {}
        Step::Fetch => {
            let source = Arc::clone(source);
            pending.push(async move { Fired::Fetched(source.next_encounter().await) }.boxed());
        }
        Step::Hold { delay, then } => {
            pending.push(
                async move {
                    tokio::time::sleep(delay).await;
                    Fired::Hold(then)
                }
                .boxed(),
            );
        }
    }
}

//! Terminal rendition of audio cues.
//!
//! There is no audio backend; cues are written as short bracketed notes and
//! rare encounters also ring the terminal bell.

use std::io::{Write, stdout};
use std::sync::atomic::{AtomicBool, Ordering};

use pokecatch_engine::CueSink;
use pokecatch_engine::pokecatch_types::{Cue, CueIntent};

#[derive(Debug)]
pub struct TerminalCues {
    enabled: AtomicBool,
}

impl TerminalCues {
    pub fn new() -> Self {
        Self {
            enabled: AtomicBool::new(true),
        }
    }
}

impl CueSink for TerminalCues {
    fn play(&self, intent: &CueIntent) {
        if !self.is_enabled() {
            return;
        }
        let note = note(&intent.cue);
        if intent.offset.is_zero() {
            emit(&note);
            return;
        }
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let offset = intent.offset;
                handle.spawn(async move {
                    tokio::time::sleep(offset).await;
                    emit(&note);
                });
            }
            Err(_) => emit(&note),
        }
    }

    fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }
}

fn note(cue: &Cue) -> String {
    match cue {
        Cue::RareEncounter => format!("\x07[{}]", cue.label()),
        _ => format!("[{}]", cue.label()),
    }
}

fn emit(note: &str) {
    let mut out = stdout().lock();
    if let Err(e) = writeln!(out, "{note}").and_then(|()| out.flush()) {
        tracing::debug!("Failed to write cue: {e}");
    }
}

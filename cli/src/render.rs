//! Plain-text rendering of session snapshots.

use std::fmt::Write;

use pokecatch_engine::pokecatch_types::{CreatureRecord, MAX_ATTEMPTS, ROSTER_CAPACITY};
use pokecatch_engine::{Phase, Snapshot};

use crate::input::View;

pub const HELP: &str = "\
Commands:
  start            look for a creature
  throw            throw a ball
  flee             run away
  team             show your team
  release <n>      release team member n (1-6)
  fav <id>         toggle a species as favorite
  cancel           let a creature waiting for a team slot go
  dex              collection progress
  stats            encounter statistics
  sound on|off     toggle sound cues
  dark on|off      toggle dark theme
  help             this list
  quit             leave";

/// Prints status lines only when they change.
pub struct Renderer {
    locale: String,
    last_status: Option<String>,
}

impl Renderer {
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            last_status: None,
        }
    }

    /// Status line for `snapshot`, or `None` if it matches the last one.
    pub fn frame(&mut self, snapshot: &Snapshot) -> Option<String> {
        let status = self.status(snapshot);
        if self.last_status.as_deref() == Some(status.as_str()) {
            return None;
        }
        self.last_status = Some(status.clone());
        Some(status)
    }

    pub fn status(&self, snapshot: &Snapshot) -> String {
        if let Some(waiting) = &snapshot.deferred {
            return format!(
                "Gotcha! {} was caught, but your team is full. \
                 `release <n>` to make room or `cancel` to let it go.",
                waiting.display_name()
            );
        }

        let Some(creature) = &snapshot.current else {
            if let Some(error) = &snapshot.last_error {
                return format!("Something went wrong: {error}. Type `start` to try again.");
            }
            if snapshot.processing {
                return "Searching the tall grass...".to_string();
            }
            return "Nothing around. Type `start` to look for a creature.".to_string();
        };

        let name = creature.display_name();
        match snapshot.phase {
            Phase::Idle => format!(
                "A wild {} appeared! Balls: {}/{MAX_ATTEMPTS}",
                self.describe(creature),
                snapshot.attempts
            ),
            Phase::Throwing => format!("You threw a ball at {name}..."),
            Phase::Capturing => format!("The ball wobbles... {name} is being caught!"),
            Phase::Fleeing => format!("{name} got away."),
            Phase::RejectedLeft => format!("{name} broke free and dodged left!"),
            Phase::RejectedRight => format!("{name} broke free and dodged right!"),
        }
    }

    pub fn view(&self, view: View, snapshot: &Snapshot) -> String {
        match view {
            View::Team => self.team(snapshot),
            View::Dex => dex(snapshot),
            View::Stats => stats(snapshot),
            View::Help => HELP.to_string(),
        }
    }

    fn describe(&self, creature: &CreatureRecord) -> String {
        let types: Vec<&str> = creature
            .types
            .iter()
            .map(|kind| kind.display_name(&self.locale))
            .collect();
        let mut text = format!(
            "{} {} [{}]",
            creature.display_name(),
            creature.id.dex_number(),
            types.join("/")
        );
        if creature.is_rare {
            text.push_str(" (shiny)");
        }
        text
    }

    fn team(&self, snapshot: &Snapshot) -> String {
        let roster = &snapshot.collection.roster;
        let mut out = format!("Team ({}/{ROSTER_CAPACITY})", roster.len());
        if roster.is_empty() {
            out.push_str("\n  (empty)");
        }
        for (position, creature) in roster.iter().enumerate() {
            let star = if creature.is_favorite { "*" } else { " " };
            let _ = write!(out, "\n {star}{}. {}", position + 1, self.describe(creature));
        }
        out
    }
}

fn dex(snapshot: &Snapshot) -> String {
    let progress = snapshot.progress;
    let mut out = format!(
        "Pokedex: {}/{} caught ({}%), {} seen",
        progress.caught,
        progress.total,
        progress.completion_percent(),
        progress.seen
    );
    if progress.is_complete() {
        out.push_str(" - complete!");
    }
    if !snapshot.collection.captured.is_empty() {
        let numbers: Vec<String> = snapshot
            .collection
            .captured
            .iter()
            .map(|id| id.dex_number())
            .collect();
        let _ = write!(out, "\n  {}", numbers.join(" "));
    }
    out
}

fn stats(snapshot: &Snapshot) -> String {
    let view = &snapshot.collection;
    format!(
        "Encounters: {}\nCaptures: {}\nCapture rate: {}%\nSound: {}\nTheme: {}",
        view.counters.total_encounters,
        view.counters.total_captures,
        view.counters.capture_rate(),
        if view.sound_enabled { "on" } else { "off" },
        if view.dark_mode { "dark" } else { "light" },
    )
}

//! Line command parsing.

use pokecatch_engine::Command;
use pokecatch_engine::pokecatch_types::SpeciesId;

/// Read-only screens rendered from the latest snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Team,
    Dex,
    Stats,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Command(Command),
    Show(View),
    Quit,
    Empty,
    Invalid(String),
}

pub fn parse(line: &str) -> Input {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Input::Empty;
    };
    let arg = words.next();

    match (verb.to_ascii_lowercase().as_str(), arg) {
        ("start" | "s", None) => Input::Command(Command::Start),
        ("throw" | "t", None) => Input::Command(Command::Throw),
        ("flee" | "run", None) => Input::Command(Command::Flee),
        ("cancel", None) => Input::Command(Command::CancelDeferred),
        ("release" | "r", Some(arg)) => match arg.parse::<usize>() {
            Ok(position) if position >= 1 => Input::Command(Command::Release(position - 1)),
            _ => Input::Invalid(format!("`{arg}` is not a team position (1-6)")),
        },
        ("fav" | "favorite", Some(arg)) => match arg.trim_start_matches('#').parse::<u16>() {
            Ok(id) if id >= 1 => Input::Command(Command::ToggleFavorite(SpeciesId::new(id))),
            _ => Input::Invalid(format!("`{arg}` is not a species number")),
        },
        ("sound", Some(arg)) => toggle(arg).map_or_else(
            || Input::Invalid("usage: sound on|off".to_string()),
            |on| Input::Command(Command::SetSound(on)),
        ),
        ("dark", Some(arg)) => toggle(arg).map_or_else(
            || Input::Invalid("usage: dark on|off".to_string()),
            |on| Input::Command(Command::SetDarkMode(on)),
        ),
        ("team", None) => Input::Show(View::Team),
        ("dex", None) => Input::Show(View::Dex),
        ("stats", None) => Input::Show(View::Stats),
        ("help" | "?", None) => Input::Show(View::Help),
        ("quit" | "exit" | "q", None) => Input::Quit,
        ("release" | "r" | "fav" | "favorite" | "sound" | "dark", None) => {
            Input::Invalid(format!("`{verb}` needs an argument; type `help`"))
        }
        _ => Input::Invalid(format!("unknown command `{}`; type `help`", line.trim())),
    }
}

fn toggle(arg: &str) -> Option<bool> {
    match arg.to_ascii_lowercase().as_str() {
        "on" | "true" | "1" => Some(true),
        "off" | "false" | "0" => Some(false),
        _ => None,
    }
}

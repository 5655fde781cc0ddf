//! Audio cue intents emitted toward the presentation layer.

use std::time::Duration;

/// A sound the presentation layer should play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cue {
    /// The creature's own cry, by URL.
    Cry(String),
    Throw,
    CaptureSuccess,
    CaptureFail,
    RareEncounter,
    Click,
}

impl Cue {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Cry(_) => "cry",
            Self::Throw => "throw",
            Self::CaptureSuccess => "capture-success",
            Self::CaptureFail => "capture-fail",
            Self::RareEncounter => "rare-encounter",
            Self::Click => "click",
        }
    }
}

/// A cue plus how long after emission it should start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CueIntent {
    pub cue: Cue,
    pub offset: Duration,
}

impl CueIntent {
    #[must_use]
    pub fn now(cue: Cue) -> Self {
        Self {
            cue,
            offset: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn after(cue: Cue, offset: Duration) -> Self {
        Self { cue, offset }
    }
}

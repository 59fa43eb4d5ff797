use serde::Serialize;
use std::fmt;

/// Where a search run is, or where it stopped.
///
/// `Idle → LoggingIn → Searching → CollectingLinks → ProcessingProfile* → Done`,
/// with `Aborted` reachable only from `LoggingIn` and `Searching`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum SearchPhase {
    Idle,
    LoggingIn,
    Searching,
    CollectingLinks,
    ProcessingProfile { index: usize },
    Done,
    Aborted,
}

impl SearchPhase {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Aborted)
    }

    /// Whether a run may move from `self` to `next`.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        use SearchPhase::*;
        match (self, next) {
            (Idle, LoggingIn) => true,
            (LoggingIn, Searching | Aborted) => true,
            (Searching, CollectingLinks | Aborted) => true,
            (CollectingLinks, ProcessingProfile { index: 0 } | Done) => true,
            (ProcessingProfile { index }, ProcessingProfile { index: following }) => {
                following == index + 1
            }
            (ProcessingProfile { .. }, Done) => true,
            _ => false,
        }
    }
}

impl fmt::Display for SearchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::LoggingIn => f.write_str("logging in"),
            Self::Searching => f.write_str("searching"),
            Self::CollectingLinks => f.write_str("collecting links"),
            Self::ProcessingProfile { index } => write!(f, "processing profile {}", index + 1),
            Self::Done => f.write_str("done"),
            Self::Aborted => f.write_str("aborted"),
        }
    }
}

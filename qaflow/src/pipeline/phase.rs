//! The fixed run state machine.
//!
//! `Start -> Retrieved -> WebSearched -> Answered`. Every transition is
//! unconditional: a failed stage still advances the machine.

use crate::stages::Step;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a run in the fixed three-stage sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No stage has run yet.
    #[default]
    Start,
    /// The retrieval stage has run.
    Retrieved,
    /// The web search stage has run.
    WebSearched,
    /// The answer stage has run. Terminal.
    Answered,
}

impl Phase {
    /// The stage to run from this phase, or `None` once terminal.
    #[must_use]
    pub const fn pending_step(self) -> Option<Step> {
        match self {
            Self::Start => Some(Step::Retrieve),
            Self::Retrieved => Some(Step::WebSearch),
            Self::WebSearched => Some(Step::GenerateAnswer),
            Self::Answered => None,
        }
    }

    /// The next phase. Total; the terminal phase maps to itself.
    #[must_use]
    pub const fn advance(self) -> Self {
        match self {
            Self::Start => Self::Retrieved,
            Self::Retrieved => Self::WebSearched,
            Self::WebSearched | Self::Answered => Self::Answered,
        }
    }

    /// Returns true for the terminal phase.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Answered)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "start"),
            Self::Retrieved => write!(f, "retrieved"),
            Self::WebSearched => write!(f, "web_searched"),
            Self::Answered => write!(f, "answered"),
        }
    }
}

//! The three pipeline stages and the trait they share.
//!
//! A stage reads what it needs from [`GraphState`], calls its capability, and
//! mutates only the fields it owns once the call has succeeded. On failure it
//! returns a [`StageError`] and leaves the state untouched; recording the
//! error and stamping `current_step` is the orchestrator's job.

mod generate;
mod retrieve;
mod web_search;

pub use generate::{GenerateAnswerStage, ANSWER_TEMPLATE};
pub use retrieve::RetrieveStage;
pub use web_search::WebSearchStage;

use crate::core::GraphState;
use crate::errors::StageError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};

/// Names of the pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Query the retriever.
    Retrieve,
    /// Query the web-search tool.
    WebSearch,
    /// Prompt the language model.
    GenerateAnswer,
}

impl Step {
    /// Every step, in execution order.
    pub const ALL: [Self; 3] = [Self::Retrieve, Self::WebSearch, Self::GenerateAnswer];

    /// The name recorded in `current_step`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Retrieve => "retrieve",
            Self::WebSearch => "web_search",
            Self::GenerateAnswer => "generate_answer",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait for pipeline stages.
#[async_trait]
pub trait Stage: Send + Sync + Debug {
    /// Which step this stage implements.
    fn step(&self) -> Step;

    /// Executes the stage against the run state.
    async fn execute(&self, state: &mut GraphState) -> Result<(), StageError>;
}

//! Error types for qaflow.
//!
//! Three layers of failure exist:
//!
//! - [`CapabilityError`]: raised by an injected retriever, web-search tool or
//!   language model. Its display is exactly its message.
//! - [`StageError`]: the single failure kind a stage reports back to the
//!   orchestrator. It is always contained and never escapes a run.
//! - [`QaflowError`]: everything outside a run, such as loading settings,
//!   installing the log subscriber or building an HTTP adapter.

use crate::stages::Step;
use thiserror::Error;

/// The main error type for qaflow operations outside a pipeline run.
#[derive(Debug, Error)]
pub enum QaflowError {
    /// Invalid or unreadable configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A prompt template could not be parsed or rendered.
    #[error("Template error: {0}")]
    Template(String),

    /// HTTP client construction failed.
    #[cfg(feature = "ollama")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A generic internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error raised by a capability handle.
///
/// The message is recorded verbatim in the run state when the owning stage
/// fails, so it carries no prefix of its own.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CapabilityError {
    /// The failure message.
    pub message: String,
}

impl CapabilityError {
    /// Creates a new capability error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for CapabilityError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for CapabilityError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

#[cfg(feature = "ollama")]
impl From<reqwest::Error> for CapabilityError {
    fn from(err: reqwest::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// Error reported when a stage fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Stage {stage} failed: {message}")]
pub struct StageError {
    /// Stage that failed.
    pub stage: Step,
    /// Original error message.
    pub message: String,
}

impl StageError {
    /// Creates a new stage error.
    #[must_use]
    pub fn new(stage: Step, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
        }
    }

    /// Wraps a capability failure, keeping its message untouched.
    #[must_use]
    pub fn from_capability(stage: Step, err: CapabilityError) -> Self {
        Self {
            stage,
            message: err.message,
        }
    }
}

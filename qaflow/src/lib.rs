//! # qaflow
//!
//! A fixed three-stage question-answering pipeline:
//!
//! 1. **retrieve**: ask a [`Retriever`](ports::Retriever) for relevant documents
//! 2. **web_search**: ask a [`WebSearchTool`](ports::WebSearchTool) for more context
//! 3. **generate_answer**: render the context and question into a prompt and
//!    ask a [`LanguageModel`](ports::LanguageModel)
//!
//! One [`GraphState`](core::GraphState) is threaded through all three stages.
//! A failing stage never aborts the run: its message lands in the state's
//! error slot and the next stage runs anyway. Callers check
//! [`GraphState::error`](core::GraphState::error) after the run.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use qaflow::prelude::*;
//! use std::sync::Arc;
//!
//! let settings = Arc::new(Settings::from_env()?);
//! let llm = Arc::new(OllamaLlm::from_settings(&settings)?);
//! let pipeline = create_agent(my_retriever, my_search_tool, llm, settings);
//!
//! let state = pipeline.run("What is the capital of France?").await;
//! match state.error() {
//!     None => println!("{}", state.final_answer()),
//!     Some(err) => eprintln!("run degraded: {err}"),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod config;
pub mod core;
pub mod errors;
pub mod events;
pub mod observability;
pub mod pipeline;
pub mod ports;
pub mod prompt;
pub mod stages;
pub mod testing;

#[cfg(feature = "ollama")]
pub mod llm;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{LoggingConfig, Settings};
    pub use crate::core::{ContextItem, GraphState, StageRecord, StageStatus};
    pub use crate::errors::{CapabilityError, QaflowError, StageError};
    pub use crate::events::{EventSink, LoggingEventSink, NoOpEventSink};
    pub use crate::observability::init_logging;
    pub use crate::pipeline::{create_agent, Phase, QaPipeline};
    pub use crate::ports::{Document, GenerationRequest, LanguageModel, Retriever, WebSearchTool};
    pub use crate::stages::Step;

    #[cfg(feature = "ollama")]
    pub use crate::llm::OllamaLlm;
}

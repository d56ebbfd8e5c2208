//! Testing utilities for qaflow pipelines.
//!
//! This module provides:
//! - In-memory retrievers, web search tools and language models
//! - Assertions over finished run states

mod assertions;
mod mocks;

pub use assertions::{
    assert_all_stages_ran, assert_context_texts, assert_run_error, assert_run_succeeded,
};
pub use mocks::{
    EchoLanguageModel, FailingLanguageModel, FailingRetriever, FailingWebSearch,
    RecordingLanguageModel, StaticRetriever, StaticWebSearch,
};

//! Capability ports injected into a pipeline.
//!
//! Stages never construct their collaborators. A retriever and a web-search
//! tool are bound into the run state; the language model is bound into the
//! answer stage. Each port is a narrow async call that may fail with a
//! [`CapabilityError`].

use crate::core::ContextItem;
use crate::errors::CapabilityError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

#[cfg(test)]
use mockall::automock;

/// A document returned by a [`Retriever`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    /// The textual content of the document.
    pub page_content: String,
    /// Free-form metadata attached by the retriever.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl Document {
    /// Creates a document with no metadata.
    #[must_use]
    pub fn new(page_content: impl Into<String>) -> Self {
        Self {
            page_content: page_content.into(),
            metadata: serde_json::Map::new(),
        }
    }

    /// Adds a metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// Looks up documents relevant to a query.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Retriever: Send + Sync + Debug {
    /// Returns the relevant documents, most relevant first.
    async fn get_relevant_documents(&self, query: &str) -> Result<Vec<Document>, CapabilityError>;
}

/// Searches the web for a query.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WebSearchTool: Send + Sync + Debug {
    /// Runs the search. Results may be plain text or structured values.
    async fn run(&self, query: &str) -> Result<Vec<ContextItem>, CapabilityError>;
}

/// A fully rendered prompt addressed to a specific model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Model identifier, e.g. `llama3`.
    pub model: String,
    /// The rendered prompt.
    pub prompt: String,
}

impl GenerationRequest {
    /// Creates a new generation request.
    #[must_use]
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
        }
    }
}

/// Turns a rendered prompt into a text response.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait LanguageModel: Send + Sync + Debug {
    /// Submits the prompt and returns the raw response text.
    async fn invoke(&self, request: &GenerationRequest) -> Result<String, CapabilityError>;
}

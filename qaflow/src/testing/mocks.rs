//! In-memory capability doubles.

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::core::ContextItem;
use crate::errors::CapabilityError;
use crate::ports::{Document, GenerationRequest, LanguageModel, Retriever, WebSearchTool};

/// A retriever that returns a fixed document list and records queries.
#[derive(Debug, Default)]
pub struct StaticRetriever {
    documents: Vec<Document>,
    queries: Mutex<Vec<String>>,
}

impl StaticRetriever {
    /// Creates a retriever returning `documents` for every query.
    #[must_use]
    pub fn new(documents: Vec<Document>) -> Self {
        Self {
            documents,
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Creates a retriever that finds nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a retriever from plain page contents.
    #[must_use]
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(texts.into_iter().map(Document::new).collect())
    }

    /// Returns the queries received so far.
    #[must_use]
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().clone()
    }
}

#[async_trait]
impl Retriever for StaticRetriever {
    async fn get_relevant_documents(&self, query: &str) -> Result<Vec<Document>, CapabilityError> {
        self.queries.lock().push(query.to_string());
        Ok(self.documents.clone())
    }
}

/// A retriever that always fails.
#[derive(Debug)]
pub struct FailingRetriever {
    error: String,
}

impl FailingRetriever {
    /// Creates a retriever failing with `error`.
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[async_trait]
impl Retriever for FailingRetriever {
    async fn get_relevant_documents(&self, _query: &str) -> Result<Vec<Document>, CapabilityError> {
        Err(CapabilityError::new(self.error.clone()))
    }
}

/// A web search tool that returns fixed results and records queries.
#[derive(Debug, Default)]
pub struct StaticWebSearch {
    results: Vec<ContextItem>,
    queries: Mutex<Vec<String>>,
}

impl StaticWebSearch {
    /// Creates a tool returning `results` for every query.
    #[must_use]
    pub fn new(results: Vec<ContextItem>) -> Self {
        Self {
            results,
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Creates a tool that finds nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the queries received so far.
    #[must_use]
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().clone()
    }
}

#[async_trait]
impl WebSearchTool for StaticWebSearch {
    async fn run(&self, query: &str) -> Result<Vec<ContextItem>, CapabilityError> {
        self.queries.lock().push(query.to_string());
        Ok(self.results.clone())
    }
}

/// A web search tool that always fails.
#[derive(Debug)]
pub struct FailingWebSearch {
    error: String,
}

impl FailingWebSearch {
    /// Creates a tool failing with `error`.
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[async_trait]
impl WebSearchTool for FailingWebSearch {
    async fn run(&self, _query: &str) -> Result<Vec<ContextItem>, CapabilityError> {
        Err(CapabilityError::new(self.error.clone()))
    }
}

/// A language model that answers with the prompt it was given.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoLanguageModel;

#[async_trait]
impl LanguageModel for EchoLanguageModel {
    async fn invoke(&self, request: &GenerationRequest) -> Result<String, CapabilityError> {
        Ok(request.prompt.clone())
    }
}

/// A language model that returns a fixed answer and records every request.
#[derive(Debug)]
pub struct RecordingLanguageModel {
    answer: String,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl RecordingLanguageModel {
    /// Creates a model answering `answer`.
    #[must_use]
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Returns the requests received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().clone()
    }

    /// Returns the number of calls.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl LanguageModel for RecordingLanguageModel {
    async fn invoke(&self, request: &GenerationRequest) -> Result<String, CapabilityError> {
        self.requests.lock().push(request.clone());
        Ok(self.answer.clone())
    }
}

/// A language model that always fails.
#[derive(Debug)]
pub struct FailingLanguageModel {
    error: String,
}

impl FailingLanguageModel {
    /// Creates a model failing with `error`.
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[async_trait]
impl LanguageModel for FailingLanguageModel {
    async fn invoke(&self, _request: &GenerationRequest) -> Result<String, CapabilityError> {
        Err(CapabilityError::new(self.error.clone()))
    }
}

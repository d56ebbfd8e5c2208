//! The mutable record threaded through every stage of a run.

use super::{ContextItem, RunIdentity, StageRecord};
use crate::ports::{Retriever, WebSearchTool};
use crate::stages::Step;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// State for one pipeline run.
///
/// The question is fixed at construction. Context can only be appended to,
/// and the error slot can be overwritten by a later failure but never cleared.
/// The retriever and web-search handles are bound here and only ever read.
#[derive(Clone)]
pub struct GraphState {
    question: String,
    context: Vec<ContextItem>,
    current_step: Option<Step>,
    final_answer: String,
    error: Option<String>,
    retriever: Arc<dyn Retriever>,
    web_search_tool: Arc<dyn WebSearchTool>,
    identity: RunIdentity,
    trace: Vec<StageRecord>,
}

impl std::fmt::Debug for GraphState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphState")
            .field("run_id", &self.identity.run_id)
            .field("question", &self.question)
            .field("context_len", &self.context.len())
            .field("current_step", &self.current_step)
            .field("has_final_answer", &!self.final_answer.is_empty())
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl GraphState {
    /// Creates the initial state for a run: empty context, no step, no answer, no error.
    #[must_use]
    pub fn new(
        question: impl Into<String>,
        retriever: Arc<dyn Retriever>,
        web_search_tool: Arc<dyn WebSearchTool>,
    ) -> Self {
        Self {
            question: question.into(),
            context: Vec::new(),
            current_step: None,
            final_answer: String::new(),
            error: None,
            retriever,
            web_search_tool,
            identity: RunIdentity::new(),
            trace: Vec::new(),
        }
    }

    /// Replaces the generated run identity.
    #[must_use]
    pub fn with_identity(mut self, identity: RunIdentity) -> Self {
        self.identity = identity;
        self
    }

    /// Seeds the context before the run starts.
    #[must_use]
    pub fn with_context(mut self, items: impl IntoIterator<Item = ContextItem>) -> Self {
        self.context.extend(items);
        self
    }

    /// The question being answered.
    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    /// Accumulated context, in insertion order.
    #[must_use]
    pub fn context(&self) -> &[ContextItem] {
        &self.context
    }

    /// The most recently completed stage, if any.
    #[must_use]
    pub const fn current_step(&self) -> Option<Step> {
        self.current_step
    }

    /// Name of the most recently completed stage, or `""` before any stage completed.
    #[must_use]
    pub fn current_step_name(&self) -> &'static str {
        self.current_step.map_or("", Step::as_str)
    }

    /// The final answer; empty until the answer stage succeeds.
    #[must_use]
    pub fn final_answer(&self) -> &str {
        &self.final_answer
    }

    /// The last failure message recorded during the run.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Returns true if any stage failed.
    #[must_use]
    pub const fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// The bound retriever.
    #[must_use]
    pub fn retriever(&self) -> &Arc<dyn Retriever> {
        &self.retriever
    }

    /// The bound web-search tool.
    #[must_use]
    pub fn web_search_tool(&self) -> &Arc<dyn WebSearchTool> {
        &self.web_search_tool
    }

    /// Identity of this run.
    #[must_use]
    pub const fn identity(&self) -> &RunIdentity {
        &self.identity
    }

    /// One record per stage that ran, in execution order.
    #[must_use]
    pub fn trace(&self) -> &[StageRecord] {
        &self.trace
    }

    /// Appends entries to the context.
    pub fn extend_context(&mut self, items: impl IntoIterator<Item = ContextItem>) {
        self.context.extend(items);
    }

    /// Stores the final answer.
    pub fn set_final_answer(&mut self, answer: impl Into<String>) {
        self.final_answer = answer.into();
    }

    /// Stamps the most recently completed stage.
    pub fn mark_completed(&mut self, step: Step) {
        self.current_step = Some(step);
    }

    /// Records a failure message. The last failure wins.
    pub fn record_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub(crate) fn push_record(&mut self, record: StageRecord) {
        self.trace.push(record);
    }

    /// A serializable view of the caller-facing fields.
    #[must_use]
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            question: self.question.clone(),
            context: self.context.clone(),
            current_step: self.current_step_name().to_string(),
            final_answer: self.final_answer.clone(),
            error: self.error.clone(),
        }
    }
}

/// The fields a caller reads back after a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// The question.
    pub question: String,
    /// Accumulated context.
    pub context: Vec<ContextItem>,
    /// Name of the last completed stage.
    pub current_step: String,
    /// The final answer.
    pub final_answer: String,
    /// The last failure message.
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{StaticRetriever, StaticWebSearch};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn state(question: &str) -> GraphState {
        GraphState::new(
            question,
            Arc::new(StaticRetriever::empty()),
            Arc::new(StaticWebSearch::empty()),
        )
    }

    #[test]
    fn test_initial_state() {
        let state = state("What is the capital of France?");

        assert_eq!(state.question(), "What is the capital of France?");
        assert!(state.context().is_empty());
        assert_eq!(state.current_step(), None);
        assert_eq!(state.current_step_name(), "");
        assert_eq!(state.final_answer(), "");
        assert_eq!(state.error(), None);
        assert!(state.trace().is_empty());
    }

    #[test]
    fn test_context_appends_in_order() {
        let mut state = state("q").with_context(vec![ContextItem::text("seed")]);
        state.extend_context(vec![ContextItem::text("A"), ContextItem::text("B")]);

        let texts: Vec<_> = state.context().iter().map(ToString::to_string).collect();
        assert_eq!(texts, vec!["seed", "A", "B"]);
    }

    #[test]
    fn test_last_error_wins() {
        let mut state = state("q");
        state.record_error("first");
        state.mark_completed(Step::WebSearch);
        assert_eq!(state.error(), Some("first"));

        state.record_error("second");
        assert_eq!(state.error(), Some("second"));
        assert!(state.has_error());
    }

    #[test]
    fn test_snapshot_has_every_field() {
        let mut state = state("Q");
        state.extend_context(vec![ContextItem::text("A")]);
        state.mark_completed(Step::Retrieve);

        let json = serde_json::to_value(state.snapshot()).unwrap();
        assert_eq!(
            json,
            json!({
                "question": "Q",
                "context": ["A"],
                "current_step": "retrieve",
                "final_answer": "",
                "error": null,
            })
        );
    }

    #[test]
    fn test_debug_hides_handles() {
        let rendered = format!("{:?}", state("q"));
        assert!(rendered.contains("GraphState"));
        assert!(rendered.contains("context_len"));
    }
}

//! Retrieval stage.

use super::{Stage, Step};
use crate::core::{ContextItem, GraphState};
use crate::errors::StageError;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// Queries the bound retriever and appends each document's content to the context.
#[derive(Debug, Clone, Copy, Default)]
pub struct RetrieveStage;

impl RetrieveStage {
    /// Creates a new retrieval stage.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Stage for RetrieveStage {
    fn step(&self) -> Step {
        Step::Retrieve
    }

    async fn execute(&self, state: &mut GraphState) -> Result<(), StageError> {
        info!("Starting retrieval process");
        let retriever = Arc::clone(state.retriever());
        let docs = retriever
            .get_relevant_documents(state.question())
            .await
            .map_err(|e| StageError::from_capability(Step::Retrieve, e))?;

        let count = docs.len();
        state.extend_context(docs.into_iter().map(|doc| ContextItem::Text(doc.page_content)));
        info!(documents = count, "Retrieved {} documents", count);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::Document;
    use crate::testing::{FailingRetriever, StaticRetriever, StaticWebSearch};
    use pretty_assertions::assert_eq;

    fn state_with(retriever: Arc<dyn crate::ports::Retriever>) -> GraphState {
        GraphState::new("What is the capital of France?", retriever, Arc::new(StaticWebSearch::empty()))
    }

    #[tokio::test]
    async fn test_appends_documents_in_order() {
        let retriever = StaticRetriever::new(vec![
            Document::new("Paris is the capital of France."),
            Document::new("Lyon is in France."),
        ]);
        let mut state = state_with(Arc::new(retriever));

        RetrieveStage::new().execute(&mut state).await.unwrap();

        assert_eq!(
            state.context(),
            &[
                ContextItem::text("Paris is the capital of France."),
                ContextItem::text("Lyon is in France."),
            ]
        );
    }

    #[tokio::test]
    async fn test_passes_question_as_query() {
        let retriever = Arc::new(StaticRetriever::new(vec![]));
        let mut state = state_with(retriever.clone());

        RetrieveStage::new().execute(&mut state).await.unwrap();

        assert_eq!(retriever.queries(), vec!["What is the capital of France?".to_string()]);
    }

    #[tokio::test]
    async fn test_failure_leaves_state_untouched() {
        let mut state = state_with(Arc::new(FailingRetriever::new("index offline")))
            .with_context(vec![ContextItem::text("seed")]);

        let err = RetrieveStage::new().execute(&mut state).await.unwrap_err();

        assert_eq!(err.stage, Step::Retrieve);
        assert_eq!(err.message, "index offline");
        assert_eq!(state.context(), &[ContextItem::text("seed")]);
        assert_eq!(state.current_step(), None);
        assert_eq!(state.error(), None);
    }
}

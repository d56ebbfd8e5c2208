//! Web search stage.

use super::{Stage, Step};
use crate::core::GraphState;
use crate::errors::StageError;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// Runs the bound web-search tool and appends its results to the context.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebSearchStage;

impl WebSearchStage {
    /// Creates a new web search stage.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Stage for WebSearchStage {
    fn step(&self) -> Step {
        Step::WebSearch
    }

    async fn execute(&self, state: &mut GraphState) -> Result<(), StageError> {
        info!("Starting web search process");
        let tool = Arc::clone(state.web_search_tool());
        let results = tool
            .run(state.question())
            .await
            .map_err(|e| StageError::from_capability(Step::WebSearch, e))?;

        let count = results.len();
        let structured = results.iter().filter(|item| item.is_structured()).count();
        state.extend_context(results);
        info!(
            results = count,
            structured,
            "Web search completed, added {} results",
            count
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ContextItem;
    use crate::testing::{FailingWebSearch, StaticRetriever, StaticWebSearch};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn state_with(tool: Arc<dyn crate::ports::WebSearchTool>) -> GraphState {
        GraphState::new("Q", Arc::new(StaticRetriever::empty()), tool)
            .with_context(vec![ContextItem::text("retrieved")])
    }

    #[tokio::test]
    async fn test_appends_results_after_existing_context() {
        let tool = StaticWebSearch::new(vec![
            ContextItem::text("France is in Europe."),
            ContextItem::structured(json!({"url": "https://example.org"})),
        ]);
        let mut state = state_with(Arc::new(tool));

        WebSearchStage::new().execute(&mut state).await.unwrap();

        assert_eq!(
            state.context(),
            &[
                ContextItem::text("retrieved"),
                ContextItem::text("France is in Europe."),
                ContextItem::structured(json!({"url": "https://example.org"})),
            ]
        );
    }

    #[tokio::test]
    async fn test_failure_keeps_prefix() {
        let mut state = state_with(Arc::new(FailingWebSearch::new("rate limited")));

        let err = WebSearchStage::new().execute(&mut state).await.unwrap_err();

        assert_eq!(err.stage, Step::WebSearch);
        assert_eq!(err.message, "rate limited");
        assert_eq!(state.context(), &[ContextItem::text("retrieved")]);
    }
}

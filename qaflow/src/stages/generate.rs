//! Answer generation stage.

use super::{Stage, Step};
use crate::config::Settings;
use crate::core::{render_context, GraphState};
use crate::errors::StageError;
use crate::ports::{GenerationRequest, LanguageModel};
use crate::prompt::PromptTemplate;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

/// The prompt sent to the language model.
pub const ANSWER_TEMPLATE: &str =
    "Based on the following context, answer the question: {question}\n\nContext: {context}";

/// Renders the accumulated context into a prompt and asks the language model.
#[derive(Debug, Clone)]
pub struct GenerateAnswerStage {
    llm: Arc<dyn LanguageModel>,
    settings: Arc<Settings>,
    template: String,
}

impl GenerateAnswerStage {
    /// Creates a stage using [`ANSWER_TEMPLATE`].
    #[must_use]
    pub fn new(llm: Arc<dyn LanguageModel>, settings: Arc<Settings>) -> Self {
        Self {
            llm,
            settings,
            template: ANSWER_TEMPLATE.to_string(),
        }
    }

    /// Replaces the prompt template. It must use `{question}` and `{context}`.
    #[must_use]
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    /// Renders the prompt for the given state.
    pub fn render_prompt(&self, state: &GraphState) -> Result<String, StageError> {
        let context = render_context(state.context());
        PromptTemplate::from_template(&self.template)
            .and_then(|t| t.format(&[("question", state.question()), ("context", &context)]))
            .map_err(|e| StageError::new(Step::GenerateAnswer, e.to_string()))
    }
}

#[async_trait]
impl Stage for GenerateAnswerStage {
    fn step(&self) -> Step {
        Step::GenerateAnswer
    }

    async fn execute(&self, state: &mut GraphState) -> Result<(), StageError> {
        info!("Starting answer generation process");
        let model = self.settings.ollama_model.clone();
        let prompt = self.render_prompt(state)?;
        debug!(model = %model, prompt_len = prompt.len(), "Rendered answer prompt");

        let request = GenerationRequest::new(model, prompt);
        let response = self
            .llm
            .invoke(&request)
            .await
            .map_err(|e| StageError::from_capability(Step::GenerateAnswer, e))?;

        state.set_final_answer(response);
        info!("Answer generation completed");
        Ok(())
    }
}

//! The question-answering pipeline.

use super::Phase;
use crate::config::Settings;
use crate::core::{GraphState, StageRecord};
use crate::events::{self, EventSink, NoOpEventSink};
use crate::ports::{LanguageModel, Retriever, WebSearchTool};
use crate::stages::{GenerateAnswerStage, RetrieveStage, Stage, Step, WebSearchStage};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, info_span, Instrument};

/// Wires the fixed retrieve, web search, generate answer sequence.
///
/// The retriever and web-search tool are bound into every state created by
/// [`QaPipeline::initial_state`]; the language model is owned by the answer
/// stage.
pub fn create_agent(
    retriever: Arc<dyn Retriever>,
    web_search_tool: Arc<dyn WebSearchTool>,
    llm: Arc<dyn LanguageModel>,
    settings: Arc<Settings>,
) -> QaPipeline {
    QaPipeline {
        name: "qa_pipeline".to_string(),
        retriever,
        web_search_tool,
        retrieve: RetrieveStage::new(),
        web_search: WebSearchStage::new(),
        generate: GenerateAnswerStage::new(llm, settings),
        events: Arc::new(NoOpEventSink),
    }
}

/// A compiled, runnable pipeline.
///
/// Running never fails: stage failures are logged, recorded in the state's
/// error slot, and the run moves on to the next stage.
pub struct QaPipeline {
    name: String,
    retriever: Arc<dyn Retriever>,
    web_search_tool: Arc<dyn WebSearchTool>,
    retrieve: RetrieveStage,
    web_search: WebSearchStage,
    generate: GenerateAnswerStage,
    events: Arc<dyn EventSink>,
}

impl std::fmt::Debug for QaPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QaPipeline")
            .field("name", &self.name)
            .field("retriever", &self.retriever)
            .field("web_search_tool", &self.web_search_tool)
            .field("generate", &self.generate)
            .finish_non_exhaustive()
    }
}

impl QaPipeline {
    /// Sets the pipeline name used in logs and events.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the event sink.
    #[must_use]
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.events = sink;
        self
    }

    /// Replaces the answer prompt template.
    #[must_use]
    pub fn with_answer_template(mut self, template: impl Into<String>) -> Self {
        self.generate = self.generate.with_template(template);
        self
    }

    /// Returns the pipeline name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The stages in execution order.
    #[must_use]
    pub fn steps(&self) -> Vec<Step> {
        let mut phase = Phase::Start;
        let mut steps = Vec::new();
        while let Some(step) = phase.pending_step() {
            steps.push(step);
            phase = phase.advance();
        }
        steps
    }

    /// Creates the state for a new run with this pipeline's capabilities bound.
    #[must_use]
    pub fn initial_state(&self, question: impl Into<String>) -> GraphState {
        GraphState::new(
            question,
            Arc::clone(&self.retriever),
            Arc::clone(&self.web_search_tool),
        )
    }

    /// Answers a question from scratch.
    pub async fn run(&self, question: impl Into<String>) -> GraphState {
        self.invoke(self.initial_state(question)).await
    }

    /// Runs every stage against `state` and hands it back.
    pub async fn invoke(&self, mut state: GraphState) -> GraphState {
        let span = info_span!(
            "qa_pipeline",
            pipeline = %self.name,
            run_id = %state.identity().run_id,
        );

        async move {
            self.events
                .emit(
                    events::PIPELINE_STARTED,
                    Some(json!({
                        "pipeline": self.name,
                        "run_id": state.identity().run_id.to_string(),
                        "question": state.question(),
                    })),
                )
                .await;

            let mut phase = Phase::Start;
            while let Some(step) = phase.pending_step() {
                self.run_stage(self.stage(step), &mut state).await;
                phase = phase.advance();
            }

            info!(
                phase = %phase,
                current_step = state.current_step_name(),
                failed = state.has_error(),
                "Pipeline run finished"
            );
            self.events
                .emit(
                    events::PIPELINE_COMPLETED,
                    Some(json!({
                        "pipeline": self.name,
                        "run_id": state.identity().run_id.to_string(),
                        "current_step": state.current_step_name(),
                        "error": state.error(),
                    })),
                )
                .await;
            state
        }
        .instrument(span)
        .await
    }

    fn stage(&self, step: Step) -> &dyn Stage {
        match step {
            Step::Retrieve => &self.retrieve,
            Step::WebSearch => &self.web_search,
            Step::GenerateAnswer => &self.generate,
        }
    }

    async fn run_stage(&self, stage: &dyn Stage, state: &mut GraphState) {
        let step = stage.step();
        let started_at = Utc::now();
        let context_before = state.context().len();

        match stage.execute(state).await {
            Ok(()) => {
                state.mark_completed(step);
                let record =
                    StageRecord::completed(step, started_at, context_before, state.context().len());
                self.events
                    .emit(
                        events::STAGE_COMPLETED,
                        Some(json!({
                            "stage": step.as_str(),
                            "appended": record.appended(),
                            "duration_ms": record.duration_ms(),
                        })),
                    )
                    .await;
                state.push_record(record);
            }
            Err(err) => {
                error!(stage = %step, error = %err.message, "Error in {} stage: {}", step, err.message);
                state.record_error(err.message.clone());
                let record = StageRecord::failed(
                    step,
                    started_at,
                    context_before,
                    state.context().len(),
                    err.message,
                );
                self.events
                    .emit(
                        events::STAGE_FAILED,
                        Some(json!({
                            "stage": step.as_str(),
                            "error": record.error,
                            "duration_ms": record.duration_ms(),
                        })),
                    )
                    .await;
                state.push_record(record);
            }
        }
    }
}

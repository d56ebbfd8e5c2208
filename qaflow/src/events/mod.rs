//! Event emission for pipeline observability.
//!
//! The orchestrator emits one event when a run starts, one per stage, and
//! one when the run reaches its terminal phase. Events are informational;
//! nothing in a run depends on them.

mod sink;

pub use sink::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};

/// Emitted before the first stage runs.
pub const PIPELINE_STARTED: &str = "pipeline.started";
/// Emitted when a stage succeeds.
pub const STAGE_COMPLETED: &str = "stage.completed";
/// Emitted when a stage fails and the failure is contained.
pub const STAGE_FAILED: &str = "stage.failed";
/// Emitted once the terminal phase is reached.
pub const PIPELINE_COMPLETED: &str = "pipeline.completed";

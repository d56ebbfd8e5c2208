//! Core types: run state, context entries, stage records.

mod context_item;
mod identity;
mod record;
mod state;
mod status;

pub use context_item::{render_context, ContextItem};
pub use identity::RunIdentity;
pub use record::StageRecord;
pub use state::{GraphState, StateSnapshot};
pub use status::StageStatus;

//! Pipeline wiring and execution.
//!
//! This module provides:
//! - The fixed [`Phase`] state machine
//! - [`create_agent`] and the runnable [`QaPipeline`]

mod agent;
mod phase;


pub use agent::{create_agent, QaPipeline};
pub use phase::Phase;

//! Test assertions for finished runs.

use crate::core::GraphState;
use crate::stages::Step;

/// Asserts that the run finished without any recorded failure.
pub fn assert_run_succeeded(state: &GraphState) {
    assert!(
        state.error().is_none(),
        "Expected a clean run, got error: {:?}",
        state.error()
    );
    assert_eq!(
        state.current_step(),
        Some(Step::GenerateAnswer),
        "Expected the answer stage to be the last completed step"
    );
}

/// Asserts that the recorded error equals `expected`.
pub fn assert_run_error(state: &GraphState, expected: &str) {
    assert_eq!(
        state.error(),
        Some(expected),
        "Expected error {:?}, got {:?}",
        expected,
        state.error()
    );
}

/// Asserts that the rendered context entries equal `expected`, in order.
pub fn assert_context_texts(state: &GraphState, expected: &[&str]) {
    let actual: Vec<String> = state.context().iter().map(ToString::to_string).collect();
    assert_eq!(
        actual, expected,
        "Context mismatch: expected {expected:?}, got {actual:?}"
    );
}

/// Asserts that every stage ran exactly once, in pipeline order.
pub fn assert_all_stages_ran(state: &GraphState) {
    let steps: Vec<Step> = state.trace().iter().map(|r| r.step).collect();
    assert_eq!(
        steps,
        Step::ALL.to_vec(),
        "Expected every stage to run once in order, got {steps:?}"
    );
}

//! Scenario state for orchestration behavioural tests.

use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;

/// One compose step seen by the recording runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RecordedCall {
    /// `build`, `up` or `down`.
    pub(crate) action: String,
    /// Injected variables as `NAME=VALUE`, in file order.
    pub(crate) env: Vec<String>,
}

/// High-level outcome from an orchestration call.
#[derive(Debug, Clone)]
pub(crate) enum OrchestrationResult {
    /// Orchestration completed.
    Ok,
    /// Orchestration returned an error.
    Err(String),
}

#[derive(Default, ScenarioState)]
pub(crate) struct OrchestrationState {
    /// Env file lines; no env file is written while this is empty.
    pub(crate) env_lines: Slot<Vec<String>>,
    pub(crate) has_dockerfile: Slot<bool>,
    pub(crate) build_exit: Slot<i32>,
    pub(crate) calls: Slot<Vec<RecordedCall>>,
    pub(crate) result: Slot<OrchestrationResult>,
}

#[fixture]
pub(crate) fn orchestration_state() -> OrchestrationState {
    let state = OrchestrationState::default();
    state.env_lines.set(Vec::new());
    state.has_dockerfile.set(false);
    state.build_exit.set(0);
    state.calls.set(Vec::new());
    state
}

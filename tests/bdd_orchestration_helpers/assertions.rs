//! Assertion helpers for orchestration behavioural tests.

use rstest_bdd_macros::then;

use super::StepResult;
use super::state::{OrchestrationResult, OrchestrationState};

#[then("the outcome is success")]
fn outcome_is_success(orchestration_state: &OrchestrationState) -> StepResult<()> {
    let result = orchestration_state
        .result
        .get()
        .ok_or_else(|| String::from("result should be set"))?;

    match result {
        OrchestrationResult::Ok => Ok(()),
        OrchestrationResult::Err(msg) => Err(format!("expected success, got error: {msg}")),
    }
}

#[then("the error mentions {text}")]
fn error_mentions(orchestration_state: &OrchestrationState, text: String) -> StepResult<()> {
    let result = orchestration_state
        .result
        .get()
        .ok_or_else(|| String::from("result should be set"))?;

    match result {
        OrchestrationResult::Err(msg) if msg.contains(&text) => Ok(()),
        OrchestrationResult::Err(msg) => Err(format!(
            "expected error mentioning '{text}', got: {msg}"
        )),
        OrchestrationResult::Ok => Err(format!(
            "expected error mentioning '{text}', got success"
        )),
    }
}

#[then("the compose steps are {steps}")]
fn compose_steps_are(orchestration_state: &OrchestrationState, steps: String) -> StepResult<()> {
    let calls = orchestration_state.calls.get().unwrap_or_default();
    let actual: Vec<&str> = calls.iter().map(|call| call.action.as_str()).collect();
    let expected: Vec<&str> = steps.split(", ").collect();

    if actual == expected {
        Ok(())
    } else {
        Err(format!("expected compose steps {expected:?}, got {actual:?}"))
    }
}

#[then("no compose step ran")]
fn no_compose_step_ran(orchestration_state: &OrchestrationState) -> StepResult<()> {
    let calls = orchestration_state.calls.get().unwrap_or_default();
    if calls.is_empty() {
        Ok(())
    } else {
        Err(format!("expected no compose steps, got {calls:?}"))
    }
}

#[then("every compose step received {pair}")]
fn every_step_received(orchestration_state: &OrchestrationState, pair: String) -> StepResult<()> {
    let calls = orchestration_state.calls.get().unwrap_or_default();
    if calls.is_empty() {
        return Err(String::from("expected at least one compose step"));
    }

    match calls.iter().find(|call| !call.env.contains(&pair)) {
        None => Ok(()),
        Some(call) => Err(format!(
            "expected '{}' to receive {pair}, got {:?}",
            call.action, call.env
        )),
    }
}

#[then("no variables were injected")]
fn no_variables_injected(orchestration_state: &OrchestrationState) -> StepResult<()> {
    let calls = orchestration_state.calls.get().unwrap_or_default();
    match calls.iter().find(|call| !call.env.is_empty()) {
        None => Ok(()),
        Some(call) => Err(format!(
            "expected '{}' to receive no variables, got {:?}",
            call.action, call.env
        )),
    }
}

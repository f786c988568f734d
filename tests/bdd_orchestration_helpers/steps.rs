//! Given/when/then steps for orchestration scenarios.

use std::cell::RefCell;
use std::fs;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use loadenv::api::{down, up};
use loadenv::compose::{ComposeAction, ComposeInvocation, ComposeRunner};
use loadenv::config::AppConfig;
use loadenv::error::{ExitOutcome, Result as LoadenvResult};
use rstest_bdd_macros::{given, when};
use tempfile::TempDir;

use super::StepResult;
use super::state::{OrchestrationResult, OrchestrationState, RecordedCall};

/// Compose runner that records each step instead of spawning a process.
struct RecordingRunner {
    build_exit: i32,
    calls: RefCell<Vec<RecordedCall>>,
}

impl ComposeRunner for RecordingRunner {
    fn run(&self, invocation: &ComposeInvocation) -> io::Result<ExitOutcome> {
        let action = match invocation.action() {
            ComposeAction::Build => "build",
            ComposeAction::Up => "up",
            ComposeAction::Down => "down",
        };
        let env = invocation
            .env()
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        self.calls.borrow_mut().push(RecordedCall {
            action: String::from(action),
            env,
        });

        let code = if invocation.action() == ComposeAction::Build {
            self.build_exit
        } else {
            0
        };
        Ok(ExitOutcome::Code(code))
    }
}

/// Write the configured project into a scratch directory, run `operation`
/// against it, and store the recorded calls and outcome.
fn invoke_orchestration<F>(orchestration_state: &OrchestrationState, operation: F) -> StepResult<()>
where
    F: FnOnce(&AppConfig, &Utf8Path, &RecordingRunner) -> LoadenvResult<()>,
{
    let dir = TempDir::new().map_err(|e| format!("failed to create project directory: {e}"))?;
    let root = Utf8PathBuf::try_from(dir.path().to_path_buf())
        .map_err(|e| format!("project path is not UTF-8: {e}"))?;

    let lines = orchestration_state.env_lines.get().unwrap_or_default();
    if !lines.is_empty() {
        let content = lines.join("\n") + "\n";
        fs::write(root.join(".env"), content)
            .map_err(|e| format!("failed to write .env: {e}"))?;
    }
    if orchestration_state.has_dockerfile.get().unwrap_or(false) {
        fs::write(root.join("Dockerfile"), "FROM scratch\n")
            .map_err(|e| format!("failed to write Dockerfile: {e}"))?;
    }

    let runner = RecordingRunner {
        build_exit: orchestration_state.build_exit.get().unwrap_or(0),
        calls: RefCell::new(Vec::new()),
    };
    let result = match operation(&AppConfig::default(), &root, &runner) {
        Ok(()) => OrchestrationResult::Ok,
        Err(e) => OrchestrationResult::Err(e.to_string()),
    };

    orchestration_state.calls.set(runner.calls.into_inner());
    orchestration_state.result.set(result);
    Ok(())
}

#[given("a project directory")]
fn given_project_directory(orchestration_state: &OrchestrationState) {
    // State defaults already describe an empty project.
    let _ = orchestration_state;
}

#[given("the env file has the line {line}")]
fn given_env_line(orchestration_state: &OrchestrationState, line: String) {
    let mut lines = orchestration_state.env_lines.get().unwrap_or_default();
    lines.push(line);
    orchestration_state.env_lines.set(lines);
}

#[given("the project has a Dockerfile")]
fn given_dockerfile(orchestration_state: &OrchestrationState) {
    orchestration_state.has_dockerfile.set(true);
}

#[given("compose build exits with code {code}")]
fn given_build_exit(orchestration_state: &OrchestrationState, code: i32) {
    orchestration_state.build_exit.set(code);
}

#[when("up is invoked")]
fn when_up_invoked(orchestration_state: &OrchestrationState) -> StepResult<()> {
    invoke_orchestration(orchestration_state, up)
}

#[when("down is invoked")]
fn when_down_invoked(orchestration_state: &OrchestrationState) -> StepResult<()> {
    invoke_orchestration(orchestration_state, down)
}

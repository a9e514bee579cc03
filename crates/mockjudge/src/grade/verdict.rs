//! Classification of pipeline results into grade outcomes
//!
//! Checks run in a fixed order: a pipeline stage failure first, then the run
//! timer, then the exit code, and only then the output itself.

use std::time::Duration;

use crate::normalize::normalize;
use crate::types::{ExecutionResult, FailureKind, GradeMode, GradeOutcome, StageFailure};

/// Grade a result against an expected output
pub fn judge(result: &ExecutionResult, expected: &str, timeout: Duration) -> GradeOutcome {
    if let Some(outcome) = stage_failure(result, GradeMode::Compare) {
        return outcome;
    }
    if result.timed_out {
        return run_timeout(result, timeout, GradeMode::Compare);
    }
    if result.exit_code != Some(0) {
        let text = format!(
            "{}\n{}",
            FailureKind::RuntimeError.label(),
            result.stderr.trim()
        );
        return GradeOutcome::failed(
            GradeMode::Compare,
            FailureKind::RuntimeError,
            text.trim().to_owned(),
        );
    }

    let expected = normalize(expected);
    let actual = normalize(&result.stdout);
    if expected == actual {
        GradeOutcome::passed()
    } else {
        GradeOutcome::mismatch(expected, actual)
    }
}

/// Report a result with no expected output
pub fn report(result: &ExecutionResult, timeout: Duration) -> GradeOutcome {
    if let Some(outcome) = stage_failure(result, GradeMode::Informational) {
        return outcome;
    }
    if result.timed_out {
        return run_timeout(result, timeout, GradeMode::Informational);
    }

    let stdout = normalize(&result.stdout);
    let stderr = normalize(&result.stderr);
    if result.exit_code != Some(0) {
        let text = format!(
            "{}\n\n[stdout]\n{stdout}\n\n[stderr]\n{stderr}",
            FailureKind::RuntimeError.label()
        );
        return GradeOutcome::failed(
            GradeMode::Informational,
            FailureKind::RuntimeError,
            text.trim().to_owned(),
        );
    }

    GradeOutcome::output(stdout, stderr)
}

fn stage_failure(result: &ExecutionResult, mode: GradeMode) -> Option<GradeOutcome> {
    let kind = match result.failure.as_ref()? {
        StageFailure::ToolchainUnavailable { .. } => FailureKind::ToolchainSpawnFailure,
        StageFailure::CompileTimedOut => FailureKind::CompileTimeout,
        StageFailure::CompileFailed => FailureKind::CompileFailure,
    };
    Some(GradeOutcome::failed(
        mode,
        kind,
        result.stderr.trim().to_owned(),
    ))
}

fn run_timeout(result: &ExecutionResult, timeout: Duration, mode: GradeMode) -> GradeOutcome {
    let text = format!(
        "{} ({}ms)\n{}",
        FailureKind::RunTimeout.label(),
        timeout.as_millis(),
        result.stderr.trim()
    );
    GradeOutcome::failed(mode, FailureKind::RunTimeout, text.trim().to_owned())
}

//! Compilation step
//!
//! Invokes the language's compiler with empty stdin under the compile budget.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument, warn};

use crate::config::Config;
use crate::language::LanguageSpec;
use crate::process;
use crate::runner::unlaunched;
use crate::types::{ExecutionResult, FailureKind, StageFailure};

/// Result of the compile step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileOutcome {
    /// The language runs its source directly
    NotRequired,

    /// The compiler succeeded
    Built {
        /// Artifact path reported by the language, if any
        artifact: Option<PathBuf>,
        /// The compiler's own run
        result: ExecutionResult,
    },

    /// The compiler could not be launched, failed or timed out.
    /// Carries the result to report in place of a program run.
    Failed(ExecutionResult),
}

impl CompileOutcome {
    /// Check if the run step may proceed
    pub fn is_success(&self) -> bool {
        !matches!(self, CompileOutcome::Failed(_))
    }
}

#[instrument(skip(config, language), fields(language = language.id()))]
pub(crate) async fn compile(
    config: &Config,
    language: &dyn LanguageSpec,
    source: &Path,
    work_dir: &Path,
) -> CompileOutcome {
    let Some(mut step) = language.compile(source, work_dir) else {
        return CompileOutcome::NotRequired;
    };

    if let Some(program) = config.compiler_for(language.id()) {
        step.program = program.to_owned();
    }

    let budget = step.timeout(config.timeouts.compile_ms);
    let command = step.to_process(work_dir, config.timeouts.compile_ms);

    let result = match process::execute(&command).await {
        Ok(result) => result,
        Err(e) => {
            warn!(error = %e, "compiler could not be launched");
            return CompileOutcome::Failed(unlaunched(e));
        }
    };

    if result.timed_out {
        warn!(budget_ms = budget.as_millis(), "compilation timed out");
        let stderr = format!(
            "{} ({}ms)\n{}",
            FailureKind::CompileTimeout.label(),
            budget.as_millis(),
            result.stderr
        );
        return CompileOutcome::Failed(ExecutionResult {
            exit_code: None,
            signal: None,
            stdout: String::new(),
            stderr: stderr.trim().to_owned(),
            timed_out: true,
            wall_time: result.wall_time,
            failure: Some(StageFailure::CompileTimedOut),
        });
    }

    if result.exit_code != Some(0) {
        warn!(exit_code = ?result.exit_code, "compilation failed");
        let stderr = format!(
            "{}\n{}",
            FailureKind::CompileFailure.label(),
            compiler_output(&result)
        );
        return CompileOutcome::Failed(ExecutionResult {
            stderr: stderr.trim().to_owned(),
            failure: Some(StageFailure::CompileFailed),
            ..result
        });
    }

    debug!(
        artifact = ?step.artifact,
        wall_time_ms = result.wall_time.as_millis(),
        "compilation complete"
    );

    CompileOutcome::Built {
        artifact: step.artifact,
        result,
    }
}

/// Combine stdout and stderr, since some compilers report on stdout
fn compiler_output(result: &ExecutionResult) -> String {
    let mut output = result.stdout.trim_end().to_owned();
    let stderr = result.stderr.trim_end();
    if !output.is_empty() && !stderr.is_empty() {
        output.push('\n');
    }
    output.push_str(stderr);
    output
}

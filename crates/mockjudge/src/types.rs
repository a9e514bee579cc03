use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Outcome of a single process run, or of a pipeline stage synthesized from one
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExecutionResult {
    /// Exit code if the program exited normally. `None` means the process was killed.
    pub exit_code: Option<i32>,

    /// Signal number if the program was terminated by a signal
    pub signal: Option<i32>,

    /// Captured standard output (lossily decoded as UTF-8)
    pub stdout: String,

    /// Captured standard error (lossily decoded as UTF-8)
    pub stderr: String,

    /// Whether the wall-clock timer fired before the process exited
    pub timed_out: bool,

    /// Wall clock time from spawn to resolution
    #[serde(with = "duration_ms")]
    pub wall_time: Duration,

    /// Set when the pipeline stopped before (or instead of) running the program
    pub failure: Option<StageFailure>,
}

impl ExecutionResult {
    /// Result for a process killed by the timer.
    ///
    /// Always carries `exit_code = None`, whatever output was captured so far.
    pub fn timed_out(stdout: String, stderr: String, wall_time: Duration) -> Self {
        Self {
            exit_code: None,
            signal: None,
            stdout,
            stderr,
            timed_out: true,
            wall_time,
            failure: None,
        }
    }

    /// Check if the program ran and exited with code 0
    #[must_use]
    pub fn is_success(&self) -> bool {
        !self.timed_out && self.failure.is_none() && self.exit_code == Some(0)
    }
}

/// Why the pipeline produced a synthesized result instead of a program run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum StageFailure {
    /// The compiler, interpreter or runtime could not be launched
    ToolchainUnavailable { program: String },

    /// The compile step exceeded its budget
    CompileTimedOut,

    /// The compiler exited unsuccessfully
    CompileFailed,
}

/// Input for one run, with optional expected output.
///
/// A case without expected output is graded in informational mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub input: String,

    #[serde(default)]
    pub expected: Option<String>,
}

impl TestCase {
    /// A case with a known expected output, compared after normalization
    pub fn sample(input: impl Into<String>, expected: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            expected: Some(expected.into()),
        }
    }

    /// A case with no expected output
    pub fn informational(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            expected: None,
        }
    }

    /// A user-entered case.
    ///
    /// Blank expected output (empty or whitespace-only) is stored as no
    /// expected output, so the case runs in informational mode.
    pub fn custom(input: impl Into<String>, expected: Option<&str>) -> Self {
        let expected = expected
            .filter(|e| !e.trim().is_empty())
            .map(str::to_owned);
        Self {
            input: input.into(),
            expected,
        }
    }

    /// Check if the case carries an expected output to compare against
    pub fn is_compare(&self) -> bool {
        self.expected.is_some()
    }
}

/// Grading mode a case was evaluated in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradeMode {
    /// Actual output checked against expected output
    Compare,

    /// No expected output; captured output is reported as-is
    Informational,
}

/// Classification of a failed case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    ToolchainSpawnFailure,
    CompileTimeout,
    CompileFailure,
    RunTimeout,
    RuntimeError,
    OutputMismatch,
}

impl FailureKind {
    /// Short verdict label
    pub fn label(&self) -> &'static str {
        match self {
            FailureKind::ToolchainSpawnFailure => "toolchain unavailable",
            FailureKind::CompileTimeout => "compilation timed out",
            FailureKind::CompileFailure => "compilation failed",
            FailureKind::RunTimeout => "time limit exceeded",
            FailureKind::RuntimeError => "runtime error",
            FailureKind::OutputMismatch => "wrong answer",
        }
    }
}

/// Structured diagnostic payload of a graded case
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GradeDetail {
    /// Compare mode success
    None,

    /// Normalized expected and actual output, for two-column rendering
    Mismatch { expected: String, actual: String },

    /// Normalized captured output of an informational run
    Output { stdout: String, stderr: String },

    /// Flat diagnostic text (timeouts, runtime and compile errors)
    Diagnostic { text: String },
}

/// Result of grading one case
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GradeOutcome {
    pub ok: bool,
    pub mode: GradeMode,
    pub failure: Option<FailureKind>,
    pub detail: GradeDetail,
}

impl GradeOutcome {
    pub(crate) fn passed() -> Self {
        Self {
            ok: true,
            mode: GradeMode::Compare,
            failure: None,
            detail: GradeDetail::None,
        }
    }

    pub(crate) fn mismatch(expected: String, actual: String) -> Self {
        Self {
            ok: false,
            mode: GradeMode::Compare,
            failure: Some(FailureKind::OutputMismatch),
            detail: GradeDetail::Mismatch { expected, actual },
        }
    }

    pub(crate) fn output(stdout: String, stderr: String) -> Self {
        Self {
            ok: true,
            mode: GradeMode::Informational,
            failure: None,
            detail: GradeDetail::Output { stdout, stderr },
        }
    }

    pub(crate) fn failed(mode: GradeMode, kind: FailureKind, text: String) -> Self {
        Self {
            ok: false,
            mode,
            failure: Some(kind),
            detail: GradeDetail::Diagnostic { text },
        }
    }

    /// Flat, human-readable diagnostic text. Empty for a compare-mode pass.
    pub fn detail_text(&self) -> String {
        crate::format::render_detail(&self.detail)
    }
}

mod duration_ms {
    use std::time::Duration;

    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }
}

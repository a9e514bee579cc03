//! Execution pipeline
//!
//! Runs the optional compile step and then the run step for one submission.
//! Toolchain, compiler and program failures all come back as an
//! [`ExecutionResult`]; only malformed requests are errors.

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

pub use crate::runner::compile::CompileOutcome;

mod compile;
mod execute;

use crate::config::{Config, DEFAULT_RUN_TIMEOUT_MS};
use crate::language::LanguageSpec;
use crate::process::ProcessError;
use crate::types::{ExecutionResult, StageFailure};

/// Errors for requests that cannot be executed at all
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("source file not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("working directory not found: {0}")]
    WorkDirNotFound(PathBuf),

    #[error("timeout must be greater than zero")]
    ZeroTimeout,
}

/// One invocation of the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRequest {
    /// Source file to compile or interpret
    pub source: PathBuf,
    /// Directory the toolchain and program run in; compile artifacts are written here
    pub work_dir: PathBuf,
    /// Payload written to the program's stdin
    pub stdin: String,
    /// Wall-clock budget of the run step
    pub timeout: Duration,
}

impl ExecutionRequest {
    /// Create a request with empty stdin and the default run budget
    pub fn new(source: impl Into<PathBuf>, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            work_dir: work_dir.into(),
            stdin: String::new(),
            timeout: Duration::from_millis(DEFAULT_RUN_TIMEOUT_MS),
        }
    }

    pub fn stdin(mut self, stdin: impl Into<String>) -> Self {
        self.stdin = stdin.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check that the request can be executed
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.timeout.is_zero() {
            return Err(RequestError::ZeroTimeout);
        }
        if !self.source.is_file() {
            return Err(RequestError::SourceNotFound(self.source.clone()));
        }
        if !self.work_dir.is_dir() {
            return Err(RequestError::WorkDirNotFound(self.work_dir.clone()));
        }
        Ok(())
    }

    /// Same request with absolute paths, so the child's working directory
    /// does not change what the paths refer to
    fn resolved(&self) -> Self {
        Self {
            source: absolute(&self.source),
            work_dir: absolute(&self.work_dir),
            ..self.clone()
        }
    }
}

/// High-level runner for the compile-then-run pipeline
#[derive(Debug, Clone, Default)]
pub struct Runner {
    config: Config,
}

impl Runner {
    /// Create a new runner with the given configuration
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Create a new runner with default configuration
    pub fn with_defaults() -> Self {
        Self::new(Config::new())
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the compile step alone
    pub async fn compile(
        &self,
        language: &dyn LanguageSpec,
        source: &Path,
        work_dir: &Path,
    ) -> CompileOutcome {
        compile::compile(&self.config, language, source, work_dir).await
    }

    /// Run the run step alone, with the artifact of an earlier compile if any
    pub async fn execute(
        &self,
        language: &dyn LanguageSpec,
        request: &ExecutionRequest,
        artifact: Option<&Path>,
    ) -> ExecutionResult {
        execute::execute(&self.config, language, request, artifact).await
    }

    /// Compile if needed, then run.
    ///
    /// A failed or timed out compile step short-circuits: the run step is
    /// never attempted and the synthesized compile result is returned.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] if the source file or working directory does
    /// not exist, or the timeout is zero.
    pub async fn run_program(
        &self,
        language: &dyn LanguageSpec,
        request: &ExecutionRequest,
    ) -> Result<ExecutionResult, RequestError> {
        request.validate()?;
        let request = request.resolved();

        let artifact = match self
            .compile(language, &request.source, &request.work_dir)
            .await
        {
            CompileOutcome::NotRequired => None,
            CompileOutcome::Built { artifact, .. } => artifact,
            CompileOutcome::Failed(result) => return Ok(result),
        };

        Ok(self.execute(language, &request, artifact.as_deref()).await)
    }
}

/// Result for a toolchain that never started
fn unlaunched(error: ProcessError) -> ExecutionResult {
    let failure = match &error {
        ProcessError::Spawn { program, .. } => Some(StageFailure::ToolchainUnavailable {
            program: program.clone(),
        }),
        ProcessError::Wait { .. } => None,
    };
    ExecutionResult {
        stderr: error.to_string(),
        failure,
        ..Default::default()
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

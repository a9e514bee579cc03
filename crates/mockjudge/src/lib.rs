//! A library for compiling, running and grading competitive programming
//! submissions locally.
//!
//! Mockjudge drives the real toolchains installed on the machine (`python3`,
//! `node`, `kotlinc`, `javac`, `g++`, `gcc`) through an async
//! compile-then-run pipeline with wall-clock timeouts, and grades the output
//! against sample cases the way an online judge would.
//!
//! # Features
//!
//! - **Language registry**: Six languages behind one [`LanguageSpec`] trait.
//! - **Process runner**: Piped stdin/stdout/stderr, timeout kill, partial output kept.
//! - **Pipeline**: Optional compile step whose failures short-circuit the run.
//! - **Grading**: Whitespace-tolerant comparison, informational runs and batches.
//! - **TOML configuration**: Timeouts and per-language toolchain overrides.

pub use config::{Config, ConfigError, EXAMPLE_CONFIG};
pub use grade::{BatchReport, CaseOrigin, CaseReport, Grader, Submission};
pub use language::{ALL_LANGUAGES, LanguageId, LanguageSpec, RegistryError, describe};
pub use normalize::{normalize, outputs_match};
pub use process::{ProcessCommand, ProcessError};
pub use runner::{CompileOutcome, ExecutionRequest, RequestError, Runner};
pub use types::{
    ExecutionResult, FailureKind, GradeDetail, GradeMode, GradeOutcome, StageFailure, TestCase,
};

pub mod config;
pub mod format;
pub mod grade;
pub mod language;
pub mod normalize;
pub mod problem;
pub mod process;
pub mod runner;
pub mod types;

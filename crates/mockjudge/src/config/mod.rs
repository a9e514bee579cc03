use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::language::{DEFAULT_COMPILE_TIMEOUT_MS, LanguageId};

mod loader;

/// Example configuration embedded at compile time.
///
/// Library users can access this to generate a starter config file.
pub const EXAMPLE_CONFIG: &str = include_str!("../../mockjudge.example.toml");

/// Default budget for one run of a test case, in milliseconds
pub const DEFAULT_RUN_TIMEOUT_MS: u64 = 2_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file at {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] config::ConfigError),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Config for mockjudge
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Wall-clock budgets for the compile and run steps
    #[serde(default)]
    pub timeouts: Timeouts,

    /// Language used when none is given and the source extension is not recognized
    #[serde(default)]
    pub default_language: Option<LanguageId>,

    /// Per-language replacements for the toolchain executables
    #[serde(default)]
    pub toolchains: HashMap<LanguageId, ToolchainOverride>,
}

/// Wall-clock budgets in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeouts {
    /// Budget for a compile step without its own override
    #[serde(default = "default_compile_ms")]
    pub compile_ms: u64,

    /// Budget for each run of a test case
    #[serde(default = "default_run_ms")]
    pub run_ms: u64,
}

impl Timeouts {
    pub fn compile(&self) -> Duration {
        Duration::from_millis(self.compile_ms)
    }

    pub fn run(&self) -> Duration {
        Duration::from_millis(self.run_ms)
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            compile_ms: DEFAULT_COMPILE_TIMEOUT_MS,
            run_ms: DEFAULT_RUN_TIMEOUT_MS,
        }
    }
}

/// Replacement executables for one language (e.g. `pypy3` for `python3`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolchainOverride {
    /// Replaces the compiler of the compile step
    #[serde(default)]
    pub compiler: Option<String>,

    /// Replaces the interpreter or VM of the run step.
    /// Ignored for languages whose run step executes a native artifact.
    #[serde(default)]
    pub runtime: Option<String>,
}

impl Config {
    /// Create a new config from the embedded example
    pub fn new() -> Self {
        Self::parse_toml(EXAMPLE_CONFIG).unwrap_or_default()
    }

    /// Compiler override for a language, if configured
    pub fn compiler_for(&self, id: &str) -> Option<&str> {
        self.toolchain(id)?.compiler.as_deref()
    }

    /// Runtime override for a language, if configured
    pub fn runtime_for(&self, id: &str) -> Option<&str> {
        self.toolchain(id)?.runtime.as_deref()
    }

    fn toolchain(&self, id: &str) -> Option<&ToolchainOverride> {
        let id = id.parse::<LanguageId>().ok()?;
        self.toolchains.get(&id)
    }
}

fn default_compile_ms() -> u64 {
    DEFAULT_COMPILE_TIMEOUT_MS
}

fn default_run_ms() -> u64 {
    DEFAULT_RUN_TIMEOUT_MS
}

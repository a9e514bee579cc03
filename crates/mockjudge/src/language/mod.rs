//! Language registry
//!
//! A closed set of supported languages, each described by a [`LanguageSpec`]
//! implementation that knows its canonical source file name, its optional
//! compile step and its run step. Commands are always built as a program plus
//! an argument list and are never passed through a shell.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use crate::language::template::template;
pub use crate::language::toolchains::{C, Cpp, Java, JavaScript, Kotlin, Python};
use crate::process::ProcessCommand;

mod template;
mod toolchains;

/// Default budget for a compile step, in milliseconds
pub const DEFAULT_COMPILE_TIMEOUT_MS: u64 = 12_000;

/// Errors from looking up a language
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("unsupported language '{0}'")]
    UnknownLanguage(String),

    #[error("cannot infer language from file name '{0}'")]
    UnknownExtension(String),
}

/// Identifier of a supported language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LanguageId {
    #[serde(rename = "py")]
    Python,
    #[serde(rename = "js")]
    JavaScript,
    #[serde(rename = "kt")]
    Kotlin,
    #[serde(rename = "java")]
    Java,
    #[serde(rename = "cpp")]
    Cpp,
    #[serde(rename = "c")]
    C,
}

/// Every supported language, in listing order
pub const ALL_LANGUAGES: [LanguageId; 6] = [
    LanguageId::Python,
    LanguageId::JavaScript,
    LanguageId::Kotlin,
    LanguageId::Java,
    LanguageId::Cpp,
    LanguageId::C,
];

impl LanguageId {
    /// Short identifier, as used in configuration files and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageId::Python => "py",
            LanguageId::JavaScript => "js",
            LanguageId::Kotlin => "kt",
            LanguageId::Java => "java",
            LanguageId::Cpp => "cpp",
            LanguageId::C => "c",
        }
    }

    /// Get the descriptor for this language
    pub fn spec(self) -> &'static dyn LanguageSpec {
        match self {
            LanguageId::Python => &Python,
            LanguageId::JavaScript => &JavaScript,
            LanguageId::Kotlin => &Kotlin,
            LanguageId::Java => &Java,
            LanguageId::Cpp => &Cpp,
            LanguageId::C => &C,
        }
    }

    /// Infer the language from a source file name's extension
    pub fn from_path(path: &Path) -> Result<Self, RegistryError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .ok_or_else(|| RegistryError::UnknownExtension(path.display().to_string()))?;

        match ext.as_str() {
            "py" => Ok(LanguageId::Python),
            "js" | "mjs" => Ok(LanguageId::JavaScript),
            "kt" => Ok(LanguageId::Kotlin),
            "java" => Ok(LanguageId::Java),
            "cpp" | "cc" | "cxx" => Ok(LanguageId::Cpp),
            "c" => Ok(LanguageId::C),
            _ => Err(RegistryError::UnknownExtension(path.display().to_string())),
        }
    }
}

impl FromStr for LanguageId {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "py" | "python" | "python3" => Ok(LanguageId::Python),
            "js" | "javascript" | "node" => Ok(LanguageId::JavaScript),
            "kt" | "kotlin" => Ok(LanguageId::Kotlin),
            "java" => Ok(LanguageId::Java),
            "cpp" | "c++" | "cxx" => Ok(LanguageId::Cpp),
            "c" => Ok(LanguageId::C),
            _ => Err(RegistryError::UnknownLanguage(s.to_owned())),
        }
    }
}

impl fmt::Display for LanguageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Look up a language descriptor by identifier
pub fn describe(id: &str) -> Result<&'static dyn LanguageSpec, RegistryError> {
    id.parse::<LanguageId>().map(LanguageId::spec)
}

/// A compile step: program, arguments, budget and the artifact it writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileCommand {
    pub program: String,
    pub args: Vec<String>,

    /// Budget override in milliseconds; the configured compile timeout applies when unset
    pub timeout_ms: Option<u64>,

    /// Where the executable or archive will be written, if the toolchain reports one
    pub artifact: Option<PathBuf>,
}

impl CompileCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout_ms: None,
            artifact: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.to_string_lossy())
    }

    pub fn timeout_ms(mut self, ms: u64) -> Self {
        self.timeout_ms = Some(ms);
        self
    }

    pub fn artifact(mut self, path: impl Into<PathBuf>) -> Self {
        self.artifact = Some(path.into());
        self
    }

    /// Effective budget, given the fallback for steps without an override
    pub fn timeout(&self, fallback_ms: u64) -> Duration {
        Duration::from_millis(self.timeout_ms.unwrap_or(fallback_ms))
    }

    /// Build the process invocation, with empty stdin, in `work_dir`
    pub fn to_process(&self, work_dir: &Path, fallback_timeout_ms: u64) -> ProcessCommand {
        ProcessCommand::new(&self.program)
            .args(self.args.iter().cloned())
            .timeout(self.timeout(fallback_timeout_ms))
            .current_dir(work_dir)
    }
}

/// A run step: program and arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl RunCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.to_string_lossy())
    }

    /// Build the process invocation in `work_dir`
    pub fn to_process(&self, work_dir: &Path, stdin: &str, timeout: Duration) -> ProcessCommand {
        ProcessCommand::new(&self.program)
            .args(self.args.iter().cloned())
            .stdin(stdin)
            .timeout(timeout)
            .current_dir(work_dir)
    }
}

/// Describes how to build and run programs written in one language
///
/// Languages without a build step return `None` from [`LanguageSpec::compile`]
/// and run the source file directly. Languages with a build step must only
/// run the compiled artifact, never the raw source.
pub trait LanguageSpec: fmt::Debug + Send + Sync {
    /// Short identifier used to select this language
    fn id(&self) -> &str;

    /// Human-readable name
    fn label(&self) -> &str;

    /// Canonical source file name (e.g. `Main.java`)
    fn source_name(&self) -> &str;

    /// Line comment prefix used in starter templates
    fn comment_prefix(&self) -> &str {
        "//"
    }

    /// Interpreter or virtual machine used by the run step, if any.
    ///
    /// `None` means the run step executes a native artifact directly.
    fn runtime(&self) -> Option<&str> {
        None
    }

    /// Compile step, if this language has one
    fn compile(&self, _source: &Path, _work_dir: &Path) -> Option<CompileCommand> {
        None
    }

    /// Run step. `artifact` is the path reported by the compile step and is
    /// preferred over any default location.
    fn run(&self, source: &Path, work_dir: &Path, artifact: Option<&Path>) -> RunCommand;

    /// Check if the language has a compile step
    fn is_compiled(&self) -> bool {
        self.compile(Path::new(self.source_name()), Path::new("."))
            .is_some()
    }
}

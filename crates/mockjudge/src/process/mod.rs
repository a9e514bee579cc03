//! Child process supervision
//!
//! Spawns exactly one process per call, feeds it a single-shot stdin payload,
//! captures stdout and stderr incrementally and enforces a wall-clock
//! timeout by killing the process.

use thiserror::Error;

pub use crate::process::child::{RunState, execute};
pub use crate::process::command::ProcessCommand;

mod child;
mod command;

/// Errors that occur while supervising a child process
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to launch '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to wait for '{program}': {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

impl ProcessError {
    /// Program the error refers to
    pub fn program(&self) -> &str {
        match self {
            ProcessError::Spawn { program, .. } | ProcessError::Wait { program, .. } => program,
        }
    }
}

//! Execution step for code running
//!
//! Runs the compiled artifact or the interpreter with the request's stdin.

use std::path::Path;

use tracing::{debug, instrument, warn};

use crate::config::Config;
use crate::language::LanguageSpec;
use crate::process;
use crate::runner::{ExecutionRequest, unlaunched};
use crate::types::ExecutionResult;

#[instrument(skip(config, language, request), fields(language = language.id()))]
pub(crate) async fn execute(
    config: &Config,
    language: &dyn LanguageSpec,
    request: &ExecutionRequest,
    artifact: Option<&Path>,
) -> ExecutionResult {
    let mut step = language.run(&request.source, &request.work_dir, artifact);

    // only an interpreter or VM can be swapped, never the program itself
    if language.runtime() == Some(step.program.as_str())
        && let Some(program) = config.runtime_for(language.id())
    {
        step.program = program.to_owned();
    }

    debug!(program = %step.program, args = ?step.args, "executing program");

    let command = step.to_process(&request.work_dir, &request.stdin, request.timeout);
    match process::execute(&command).await {
        Ok(result) => result,
        Err(e) => {
            warn!(error = %e, "program could not be launched");
            unlaunched(e)
        }
    }
}

//! Spawning and supervising a child process
//!
//! The child's exit and the timer race into a single `select!`; whichever
//! resolves first settles the [`RunState`] and the other is dropped.

use std::process::{ExitStatus, Stdio};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

use crate::process::{ProcessCommand, ProcessError};
use crate::types::ExecutionResult;

/// How long to keep reading pipes after the child is gone.
/// Grandchildren that inherited the pipes can hold them open indefinitely.
const DRAIN_GRACE: Duration = Duration::from_millis(100);

const CHUNK_SIZE: usize = 8 * 1024;

type SharedBuffer = Arc<Mutex<Vec<u8>>>;

/// Lifecycle of a supervised process.
///
/// `TimedOut` and `Exited` are terminal and mutually exclusive: once the
/// state leaves `Running`, further transitions are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    TimedOut,
    Exited(ExitStatus),
}

impl RunState {
    /// Apply a transition. Only the first transition out of `Running` takes effect.
    #[must_use]
    pub fn settle(self, next: RunState) -> RunState {
        match self {
            RunState::Running => next,
            settled => settled,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, RunState::Running)
    }
}

/// Run one process to completion or until its timeout elapses.
///
/// Output captured before a timeout is kept. Returns an error only when the
/// process could not be launched or waited on; everything the program itself
/// does (crashing, hanging, printing to stderr) is reported in the result.
#[instrument(
    skip(command),
    fields(program = %command.get_program(), timeout_ms = command.get_timeout().as_millis())
)]
pub async fn execute(command: &ProcessCommand) -> Result<ExecutionResult, ProcessError> {
    let program = command.get_program();

    let mut cmd = Command::new(program);
    cmd.args(command.get_args())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(dir) = command.get_current_dir() {
        cmd.current_dir(dir);
    }

    debug!(args = ?command.get_args(), "spawning process");

    let started = Instant::now();
    let mut child = cmd.spawn().map_err(|source| ProcessError::Spawn {
        program: program.to_owned(),
        source,
    })?;

    let stdin_task = child.stdin.take().map(|mut pipe| {
        let data = command.get_stdin().to_vec();
        tokio::spawn(async move {
            // the program may exit without consuming its input
            if let Err(e) = pipe.write_all(&data).await {
                debug!(error = %e, "stdin not fully written");
            }
            let _ = pipe.shutdown().await;
        })
    });

    let stdout_buf = SharedBuffer::default();
    let stderr_buf = SharedBuffer::default();
    let mut stdout_task = capture(child.stdout.take(), stdout_buf.clone());
    let mut stderr_task = capture(child.stderr.take(), stderr_buf.clone());

    let mut state = RunState::Running;
    tokio::select! {
        status = child.wait() => {
            let status = status.map_err(|source| ProcessError::Wait {
                program: program.to_owned(),
                source,
            })?;
            state = state.settle(RunState::Exited(status));
        }
        () = tokio::time::sleep(command.get_timeout()) => {
            state = state.settle(RunState::TimedOut);
        }
    }

    if state == RunState::TimedOut {
        if let Err(e) = child.start_kill() {
            warn!(error = %e, "failed to kill timed out process");
        }
        if let Err(e) = child.wait().await {
            warn!(error = %e, "failed to reap killed process");
        }
    }

    let drained = tokio::time::timeout(DRAIN_GRACE, async {
        let _ = (&mut stdout_task).await;
        let _ = (&mut stderr_task).await;
    })
    .await;
    if drained.is_err() {
        debug!("output pipes still open after exit, keeping what was captured");
        stdout_task.abort();
        stderr_task.abort();
    }
    if let Some(task) = stdin_task {
        task.abort();
    }

    let wall_time = started.elapsed();
    let stdout = take_lossy(&stdout_buf);
    let stderr = take_lossy(&stderr_buf);

    let result = match state {
        RunState::Exited(status) => ExecutionResult {
            exit_code: status.code(),
            signal: exit_signal(&status),
            stdout,
            stderr,
            timed_out: false,
            wall_time,
            failure: None,
        },
        // select! above always settles the state
        RunState::TimedOut | RunState::Running => {
            ExecutionResult::timed_out(stdout, stderr, wall_time)
        }
    };

    debug!(
        exit_code = ?result.exit_code,
        signal = ?result.signal,
        timed_out = result.timed_out,
        wall_time_ms = result.wall_time.as_millis(),
        "process finished"
    );

    Ok(result)
}

/// Copy a pipe into a shared buffer chunk by chunk until EOF
fn capture<R>(reader: Option<R>, buffer: SharedBuffer) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let Some(mut reader) = reader else {
            return;
        };
        let mut chunk = vec![0u8; CHUNK_SIZE];
        loop {
            match reader.read(&mut chunk).await {
                Ok(0) => break,
                Ok(n) => buffer
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .extend_from_slice(&chunk[..n]),
                Err(e) => {
                    debug!(error = %e, "pipe read failed");
                    break;
                }
            }
        }
    })
}

fn take_lossy(buffer: &SharedBuffer) -> String {
    let bytes = std::mem::take(&mut *buffer.lock().unwrap_or_else(PoisonError::into_inner));
    String::from_utf8_lossy(&bytes).into_owned()
}

#[cfg(unix)]
fn exit_signal(status: &ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn exit_signal(_status: &ExitStatus) -> Option<i32> {
    None
}

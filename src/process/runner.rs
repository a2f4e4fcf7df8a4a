//! Asynchronous external-process execution
//!
//! This is the core primitive of the crate: spawn the toolchain binary
//! without a shell, capture stdout/stderr incrementally, and wait on the
//! race of natural exit, wall-clock timeout, and cooperative cancellation.
//! The runner returns only after the child's termination is observed, so no
//! process outlives a `run` call.

use crate::core::error::PublishError;
use crate::core::traits::{CommandSpec, ProcessOutcome, ProcessRunner};
use async_trait::async_trait;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Grace period between the first kill request and the forced kill
const KILL_GRACE: Duration = Duration::from_secs(5);

/// Spawns toolchain processes with timeout and cancellation control
///
/// Each `run` call owns exactly one child process and one timer and touches
/// no shared mutable state, so independent concurrent calls are safe.
/// Captured output is unbounded; callers should not point this at
/// adversarially verbose processes without an external cap.
#[derive(Debug, Default)]
pub struct ToolProcessRunner;

impl ToolProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

/// Drain a child pipe on its own task so the child never blocks on a full
/// pipe while we wait for it
fn capture<R>(reader: Option<R>) -> JoinHandle<String>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buf = String::new();
        if let Some(mut reader) = reader {
            let _ = reader.read_to_string(&mut buf).await;
        }
        buf
    })
}

/// Kill the child, escalating to a forced kill if it survives the grace
/// period; always waits until termination is observed
async fn terminate(child: &mut Child) {
    if child.start_kill().is_ok() {
        if tokio::time::timeout(KILL_GRACE, child.wait()).await.is_err() {
            let _ = child.kill().await;
        }
    } else {
        // Kill request failed: the child has most likely already exited.
        let _ = child.wait().await;
    }
}

#[async_trait]
impl ProcessRunner for ToolProcessRunner {
    async fn run(
        &self,
        spec: CommandSpec,
        cancel: CancellationToken,
    ) -> Result<ProcessOutcome, PublishError> {
        let mut command = Command::new(&spec.executable);
        command
            .args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &spec.working_dir {
            command.current_dir(dir);
        }

        let started = Instant::now();
        let mut child = command.spawn().map_err(|e| PublishError::Spawn {
            executable: spec.executable.clone(),
            message: e.to_string(),
        })?;

        let stdout_task = capture(child.stdout.take());
        let stderr_task = capture(child.stderr.take());

        let deadline = tokio::time::sleep(spec.timeout);
        tokio::pin!(deadline);

        enum Waited {
            Exited(std::process::ExitStatus),
            TimedOut,
            Cancelled,
        }

        // Cancellation is checked first when both arms are ready at once.
        let waited = tokio::select! {
            biased;
            _ = cancel.cancelled() => Waited::Cancelled,
            _ = &mut deadline => Waited::TimedOut,
            status = child.wait() => Waited::Exited(status.map_err(PublishError::Io)?),
        };

        let (exit_code, timed_out, cancelled) = match waited {
            Waited::Cancelled => {
                terminate(&mut child).await;
                (None, false, true)
            }
            Waited::TimedOut => {
                terminate(&mut child).await;
                (None, true, false)
            }
            Waited::Exited(status) => (status.code(), false, false),
        };

        let stdout = stdout_task.await.unwrap_or_default();
        let stderr = stderr_task.await.unwrap_or_default();

        Ok(ProcessOutcome {
            exit_code,
            stdout,
            stderr,
            timed_out,
            cancelled,
            wall_clock_ms: started.elapsed().as_millis() as u64,
        })
    }
}

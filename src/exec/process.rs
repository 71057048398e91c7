// src/exec/process.rs

//! Single command process runner.

use std::process::{ExitStatus, Stdio};

use anyhow::{Context, Result, anyhow};
use tokio::process::Command;
use tracing::{debug, info};

use super::{InvocationFailure, InvocationOutcome, InvocationRequest};

/// Run one command to completion and classify the result.
///
/// - The program is executed directly, not through a shell, so the payload
///   reaches it as exactly one argument.
/// - stdout/stderr are inherited so operators see the command's output;
///   stdin is closed.
/// - The child is *not* killed if this future is dropped. An abrupt stop
///   leaves the message to come back after its visibility timeout.
pub async fn run_command(request: InvocationRequest) -> InvocationOutcome {
    let cmd = request.display_command();

    match run_command_inner(&request).await {
        Ok(status) => classify(status, &cmd),
        Err(err) => {
            debug!(cmd = %cmd, error = %format!("{err:#}"), "command could not be run");
            InvocationOutcome::Failed(InvocationFailure::LaunchFailed(format!("{err:#}")))
        }
    }
}

async fn run_command_inner(request: &InvocationRequest) -> Result<ExitStatus> {
    let program = request
        .program()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| anyhow!("empty command"))?;

    info!(
        cmd = %request.display_command(),
        payload = %request.argument(),
        "starting command"
    );

    let mut child = Command::new(program)
        .args(request.fixed_args())
        .arg(request.argument())
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .with_context(|| format!("spawning '{program}'"))?;

    child
        .wait()
        .await
        .with_context(|| format!("waiting for '{program}' to exit"))
}

fn classify(status: ExitStatus, cmd: &str) -> InvocationOutcome {
    if status.success() {
        info!(cmd = %cmd, exit_code = 0, "command exited");
        return InvocationOutcome::Success;
    }

    let failure = match status.code() {
        Some(code) => InvocationFailure::NonZeroExit(code),
        None => match terminating_signal(&status) {
            Some(sig) => InvocationFailure::Signalled(sig),
            None => InvocationFailure::NonZeroExit(-1),
        },
    };

    info!(cmd = %cmd, failure = %failure, "command exited");
    InvocationOutcome::Failed(failure)
}

#[cfg(unix)]
fn terminating_signal(status: &ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn terminating_signal(_status: &ExitStatus) -> Option<i32> {
    None
}

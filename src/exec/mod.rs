// src/exec/mod.rs

//! Process execution layer.
//!
//! Runs the configured command once per message, with the message payload as
//! the final argument, and classifies how it ended.
//!
//! - [`request`] builds the argument vector.
//! - [`process`] spawns and waits for the real OS process.
//! - [`backend`] provides the `CommandInvoker` trait and the production
//!   `ProcessInvoker`; tests substitute their own invoker.

use std::fmt;

pub mod backend;
pub mod process;
pub mod request;

pub use backend::{CommandInvoker, InvokeFuture, ProcessInvoker};
pub use request::InvocationRequest;

/// How an invocation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationOutcome {
    /// The command exited with status zero.
    Success,
    Failed(InvocationFailure),
}

impl InvocationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, InvocationOutcome::Success)
    }
}

/// Why an invocation did not succeed.
///
/// The consumer treats every variant the same way (leave the message for
/// redelivery); the split only sharpens the log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationFailure {
    /// The command ran and exited with this non-zero status.
    NonZeroExit(i32),
    /// The command was terminated by this signal.
    Signalled(i32),
    /// The command could not be started (not found, not executable, ...).
    LaunchFailed(String),
}

impl InvocationFailure {
    /// Short machine-friendly label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            InvocationFailure::NonZeroExit(_) => "non_zero_exit",
            InvocationFailure::Signalled(_) => "signalled",
            InvocationFailure::LaunchFailed(_) => "launch_failed",
        }
    }
}

impl fmt::Display for InvocationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvocationFailure::NonZeroExit(code) => write!(f, "exited with status {code}"),
            InvocationFailure::Signalled(sig) => write!(f, "terminated by signal {sig}"),
            InvocationFailure::LaunchFailed(reason) => write!(f, "failed to launch: {reason}"),
        }
    }
}

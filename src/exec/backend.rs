// src/exec/backend.rs

//! Pluggable invoker abstraction.
//!
//! The consumer talks to a `CommandInvoker` instead of spawning processes
//! itself. Production uses [`ProcessInvoker`]; tests provide an invoker that
//! records the requests and returns scripted outcomes.

use std::future::Future;
use std::pin::Pin;

use super::process::run_command;
use super::{InvocationOutcome, InvocationRequest};

/// Boxed future returned by [`CommandInvoker::invoke`].
pub type InvokeFuture<'a> = Pin<Box<dyn Future<Output = InvocationOutcome> + Send + 'a>>;

/// Trait abstracting how a single command invocation is carried out.
///
/// The returned future must not resolve until processing is complete: the
/// consumer deletes the message as soon as it sees `Success`.
pub trait CommandInvoker: Send {
    fn invoke(&mut self, request: InvocationRequest) -> InvokeFuture<'_>;
}

/// Invoker that launches a real OS process and waits for it to exit.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessInvoker;

impl ProcessInvoker {
    pub fn new() -> Self {
        Self
    }
}

impl CommandInvoker for ProcessInvoker {
    fn invoke(&mut self, request: InvocationRequest) -> InvokeFuture<'_> {
        Box::pin(run_command(request))
    }
}

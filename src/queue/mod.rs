// src/queue/mod.rs

//! Queue client layer.
//!
//! The consumer talks to a `QueueClient` instead of a concrete SDK client.
//! The capability set is deliberately `{receive, delete, change_visibility}`:
//! there is no negative acknowledgement. A message that isn't deleted comes
//! back on its own once its visibility timeout elapses.
//!
//! - [`sqs`] is the production implementation backed by `aws-sdk-sqs`.
//! - [`memory`] is an in-process queue with the same visibility semantics,
//!   used by tests and local experiments.
//! - [`retry`] wraps `receive` with exponential backoff.
//! - [`lease`] holds the per-delivery [`MessageLease`].

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use crate::errors::Result;

pub mod lease;
pub mod memory;
pub mod retry;
pub mod sqs;

pub use lease::MessageLease;
pub use memory::MemoryQueue;
pub use retry::{RetryPolicy, receive_with_retry};
pub use sqs::SqsQueue;

/// Boxed future returned by [`QueueClient`] methods.
pub type QueueFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Parameters for a single receive call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiveOptions {
    /// How long the call may block waiting for a message.
    pub wait_time: Duration,
    /// How long a received message stays hidden from other consumers.
    pub visibility_timeout: Duration,
}

impl ReceiveOptions {
    /// Messages requested per receive. The loop processes one at a time.
    pub const MAX_MESSAGES: i32 = 1;
}

/// Trait abstracting the backing queue service.
///
/// Production code uses [`SqsQueue`]; tests can provide their own
/// implementation that records calls and never touches the network.
pub trait QueueClient: Send {
    /// Poll for at most one message. `Ok(None)` means the queue was empty for
    /// the whole poll window.
    fn receive(&mut self, options: ReceiveOptions) -> QueueFuture<'_, Option<MessageLease>>;

    /// Permanently remove the delivered message.
    ///
    /// Fails if the receipt handle has gone stale.
    fn delete<'a>(&'a mut self, lease: &'a MessageLease) -> QueueFuture<'a, ()>;

    /// Change how long the message stays hidden, counting from now.
    ///
    /// On success the lease's deadline is updated to match.
    fn change_visibility<'a>(
        &'a mut self,
        lease: &'a mut MessageLease,
        timeout: Duration,
    ) -> QueueFuture<'a, ()>;
}

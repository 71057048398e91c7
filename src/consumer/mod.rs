// src/consumer/mod.rs

//! The queue-draining loop.
//!
//! Two states: `Polling` and `DrainingComplete` (terminal). In `Polling` the
//! loop receives one message, runs the command on it, deletes it if the
//! command succeeded and leaves it for redelivery otherwise. The first empty
//! receive ends the run.
//!
//! The pure state machine lives in [`core`] (with the per-event logic in
//! [`handlers`]); the async IO shell that talks to the queue and the invoker
//! is [`runtime`].

use crate::exec::{InvocationOutcome, InvocationRequest};
use crate::queue::MessageLease;

pub mod core;
pub mod handlers;
pub mod runtime;

pub use self::core::ConsumerCore;
pub use runtime::Consumer;

/// Where the loop is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumerState {
    Polling,
    DrainingComplete,
}

/// Results of IO fed back into the core.
#[derive(Debug, Clone)]
pub enum ConsumerEvent {
    /// A receive call returned (`None` = queue empty).
    Received(Option<MessageLease>),
    /// The command for `lease` finished.
    Invoked {
        lease: MessageLease,
        outcome: InvocationOutcome,
    },
    /// A delete attempt for `lease` finished. The error, if any, is already
    /// rendered: delete failures are only ever logged.
    Deleted {
        lease: MessageLease,
        result: Result<(), String>,
    },
}

/// What the IO shell should do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsumerCommand {
    /// Receive the next message.
    Poll,
    /// Run the command for this lease.
    Invoke {
        lease: MessageLease,
        request: InvocationRequest,
    },
    /// Delete this lease from the queue.
    Delete(MessageLease),
    /// Stop; the queue is drained.
    Exit,
}

/// Counters reported when the loop ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainSummary {
    pub received: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub deleted: u64,
    pub delete_failures: u64,
    /// Deliveries whose visibility deadline passed while the command ran.
    pub expired_in_flight: u64,
}

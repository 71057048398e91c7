// src/consumer/handlers.rs

//! Event handling logic for the consumer core.

use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::consumer::{ConsumerCommand, ConsumerState, DrainSummary};
use crate::exec::{InvocationOutcome, InvocationRequest};
use crate::queue::MessageLease;

/// Handle the result of a receive.
///
/// - No message: the queue is drained, move to `DrainingComplete`.
/// - A message: build the invocation with the payload as final argument.
pub fn handle_received(
    state: &mut ConsumerState,
    summary: &mut DrainSummary,
    command: &[String],
    lease: Option<MessageLease>,
) -> ConsumerCommand {
    let Some(lease) = lease else {
        info!("no messages to process, exiting");
        *state = ConsumerState::DrainingComplete;
        return ConsumerCommand::Exit;
    };

    summary.received += 1;
    info!(
        message_id = lease.display_id(),
        payload = %lease.payload(),
        "received message"
    );

    let request = InvocationRequest::new(command.to_vec(), lease.payload());
    ConsumerCommand::Invoke { lease, request }
}

/// Handle a finished invocation.
///
/// - Success: delete the message.
/// - Failure of any kind: leave the message alone; it becomes visible again
///   once its visibility timeout elapses. Nothing is retried inline.
pub fn handle_invoked(
    summary: &mut DrainSummary,
    command: &[String],
    lease: MessageLease,
    outcome: InvocationOutcome,
    now: Instant,
) -> ConsumerCommand {
    if lease.is_expired(now) {
        summary.expired_in_flight += 1;
        warn!(
            message_id = lease.display_id(),
            overrun_ms = now.saturating_duration_since(lease.visibility_deadline()).as_millis() as u64,
            "visibility timeout elapsed while processing; the message may be delivered again"
        );
    } else {
        debug!(
            message_id = lease.display_id(),
            remaining_ms = lease.remaining(now).as_millis() as u64,
            "command finished within the visibility timeout"
        );
    }

    match outcome {
        InvocationOutcome::Success => {
            summary.succeeded += 1;
            ConsumerCommand::Delete(lease)
        }
        InvocationOutcome::Failed(failure) => {
            summary.failed += 1;
            warn!(
                message_id = lease.display_id(),
                cmd = %command.join(" "),
                payload = %lease.payload(),
                failure_kind = failure.kind(),
                failure = %failure,
                "failed to process message; leaving it for redelivery"
            );
            ConsumerCommand::Poll
        }
    }
}

/// Handle a finished delete. Either way the loop keeps polling.
pub fn handle_deleted(
    summary: &mut DrainSummary,
    lease: MessageLease,
    result: Result<(), String>,
) -> ConsumerCommand {
    match result {
        Ok(()) => {
            summary.deleted += 1;
            info!(message_id = lease.display_id(), "deleted message");
        }
        Err(error) => {
            summary.delete_failures += 1;
            warn!(
                message_id = lease.display_id(),
                receipt_handle = %lease.receipt_handle(),
                error = %error,
                "failed to delete processed message; it will be delivered again"
            );
        }
    }
    ConsumerCommand::Poll
}

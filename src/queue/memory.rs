// src/queue/memory.rs

//! In-process queue with visibility-timeout semantics.
//!
//! Behaves like a single SQS queue with no other producers:
//! - messages are handed out oldest first;
//! - a received message is hidden until its visibility deadline;
//! - every delivery mints a fresh receipt handle, and only the latest handle
//!   of a still-hidden message can delete or extend it;
//! - a zero visibility timeout makes a message immediately receivable again.
//!
//! `receive` never blocks: an empty queue answers `None` straight away.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::errors::{ConsumeError, Result};
use crate::queue::{MessageLease, QueueClient, QueueFuture, ReceiveOptions};
use crate::types::{QueueOperation, ReceiptHandle};

#[derive(Debug)]
struct StoredMessage {
    id: String,
    body: String,
    hidden_until: Option<Instant>,
    current_handle: Option<ReceiptHandle>,
    receive_count: u32,
}

impl StoredMessage {
    fn is_visible(&self, now: Instant) -> bool {
        self.hidden_until.is_none_or(|until| now >= until)
    }

    fn holds(&self, handle: &ReceiptHandle, now: Instant) -> bool {
        self.current_handle.as_ref() == Some(handle) && !self.is_visible(now)
    }
}

#[derive(Debug, Default)]
struct MemoryQueueState {
    messages: VecDeque<StoredMessage>,
    next_id: u64,
    next_delivery: u64,
    failing_receives: u32,
}

/// Cloneable handle to a shared in-memory queue.
#[derive(Debug, Clone, Default)]
pub struct MemoryQueue {
    state: Arc<Mutex<MemoryQueueState>>,
}

impl MemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a queue pre-filled with the given bodies, in order.
    pub fn with_messages<I, S>(bodies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let queue = Self::new();
        for body in bodies {
            queue.send(body);
        }
        queue
    }

    fn lock(&self) -> MutexGuard<'_, MemoryQueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Enqueue a message and return its id.
    pub fn send(&self, body: impl Into<String>) -> String {
        let mut state = self.lock();
        state.next_id += 1;
        let id = format!("msg-{}", state.next_id);
        state.messages.push_back(StoredMessage {
            id: id.clone(),
            body: body.into(),
            hidden_until: None,
            current_handle: None,
            receive_count: 0,
        });
        id
    }

    /// Make the next `n` receive calls fail with a queue-access error.
    pub fn fail_next_receives(&self, n: u32) {
        self.lock().failing_receives = n;
    }

    /// Messages still in the queue, visible or not.
    pub fn len(&self) -> usize {
        self.lock().messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Messages that a receive right now could return.
    pub fn visible_len(&self) -> usize {
        let now = Instant::now();
        self.lock()
            .messages
            .iter()
            .filter(|m| m.is_visible(now))
            .count()
    }

    /// How many times the message with `id` has been delivered.
    pub fn receive_count(&self, id: &str) -> Option<u32> {
        self.lock()
            .messages
            .iter()
            .find(|m| m.id == id)
            .map(|m| m.receive_count)
    }

    fn receive_now(&self, options: ReceiveOptions) -> Result<Option<MessageLease>> {
        let now = Instant::now();
        let mut state = self.lock();

        if state.failing_receives > 0 {
            state.failing_receives -= 1;
            return Err(ConsumeError::transient(
                QueueOperation::Receive,
                "simulated receive failure",
            ));
        }

        state.next_delivery += 1;
        let delivery = state.next_delivery;

        let Some(message) = state.messages.iter_mut().find(|m| m.is_visible(now)) else {
            return Ok(None);
        };

        let handle = ReceiptHandle::new(format!("{}#{}", message.id, delivery));
        message.hidden_until = Some(now + options.visibility_timeout);
        message.current_handle = Some(handle.clone());
        message.receive_count += 1;

        debug!(
            message_id = %message.id,
            receive_count = message.receive_count,
            "memory queue delivered message"
        );

        Ok(Some(MessageLease::received_at(
            message.body.clone(),
            handle,
            Some(message.id.clone()),
            now,
            options.visibility_timeout,
        )))
    }

    fn delete_now(&self, handle: &ReceiptHandle) -> Result<()> {
        let now = Instant::now();
        let mut state = self.lock();

        match state.messages.iter().position(|m| m.holds(handle, now)) {
            Some(idx) => {
                state.messages.remove(idx);
                Ok(())
            }
            None => Err(stale_handle(QueueOperation::Delete, handle)),
        }
    }

    fn change_visibility_now(&self, lease: &mut MessageLease, timeout: Duration) -> Result<()> {
        let now = Instant::now();
        let mut state = self.lock();

        let message = state
            .messages
            .iter_mut()
            .find(|m| m.holds(lease.receipt_handle(), now))
            .ok_or_else(|| stale_handle(QueueOperation::ChangeVisibility, lease.receipt_handle()))?;

        message.hidden_until = Some(now + timeout);
        lease.reset_visibility(now, timeout);
        Ok(())
    }
}

fn stale_handle(operation: QueueOperation, handle: &ReceiptHandle) -> ConsumeError {
    ConsumeError::permanent(
        operation,
        format!("receipt handle '{handle}' is stale or unknown"),
    )
}

impl QueueClient for MemoryQueue {
    fn receive(&mut self, options: ReceiveOptions) -> QueueFuture<'_, Option<MessageLease>> {
        let result = self.receive_now(options);
        Box::pin(async move { result })
    }

    fn delete<'a>(&'a mut self, lease: &'a MessageLease) -> QueueFuture<'a, ()> {
        let result = self.delete_now(lease.receipt_handle());
        Box::pin(async move { result })
    }

    fn change_visibility<'a>(
        &'a mut self,
        lease: &'a mut MessageLease,
        timeout: Duration,
    ) -> QueueFuture<'a, ()> {
        let result = self.change_visibility_now(lease, timeout);
        Box::pin(async move { result })
    }
}

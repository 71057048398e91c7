use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use sqs_consume::errors::ConsumeError;
use sqs_consume::queue::{MessageLease, QueueClient, QueueFuture, ReceiveOptions};
use sqs_consume::types::QueueOperation;

/// What the next receive call returns.
#[derive(Debug, Clone)]
pub enum ScriptedReceive {
    Message { body: String, handle: String },
    Empty,
    Error(String),
    PermanentError(String),
}

/// One call made against the queue, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueCall {
    Receive(ReceiveOptions),
    Delete(String),
    ChangeVisibility(String, Duration),
}

#[derive(Debug, Default)]
struct ScriptedState {
    script: VecDeque<ScriptedReceive>,
    calls: Vec<QueueCall>,
    failing_deletes: HashSet<String>,
}

/// A fake queue that:
/// - answers receives from a script (then `None` once the script runs out)
/// - records every call in order
/// - can be told to fail deletes for particular receipt handles.
#[derive(Debug, Clone, Default)]
pub struct ScriptedQueue {
    state: Arc<Mutex<ScriptedState>>,
}

impl ScriptedQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(self, item: ScriptedReceive) -> Self {
        self.state.lock().unwrap().script.push_back(item);
        self
    }

    pub fn message(self, body: &str, handle: &str) -> Self {
        self.push(ScriptedReceive::Message {
            body: body.to_string(),
            handle: handle.to_string(),
        })
    }

    pub fn empty(self) -> Self {
        self.push(ScriptedReceive::Empty)
    }

    /// A receive failure that the retry policy will retry.
    pub fn error(self, msg: &str) -> Self {
        self.push(ScriptedReceive::Error(msg.to_string()))
    }

    /// A receive failure that no amount of retrying fixes.
    pub fn permanent_error(self, msg: &str) -> Self {
        self.push(ScriptedReceive::PermanentError(msg.to_string()))
    }

    pub fn fail_delete(self, handle: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .failing_deletes
            .insert(handle.to_string());
        self
    }

    pub fn calls(&self) -> Vec<QueueCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn receive_calls(&self) -> Vec<ReceiveOptions> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                QueueCall::Receive(opts) => Some(opts),
                _ => None,
            })
            .collect()
    }

    pub fn deleted_handles(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                QueueCall::Delete(handle) => Some(handle),
                _ => None,
            })
            .collect()
    }
}

impl QueueClient for ScriptedQueue {
    fn receive(&mut self, options: ReceiveOptions) -> QueueFuture<'_, Option<MessageLease>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(QueueCall::Receive(options));

        let result = match state.script.pop_front() {
            Some(ScriptedReceive::Message { body, handle }) => Ok(Some(MessageLease::new(
                body,
                handle.as_str(),
                Some(format!("id-{handle}")),
                options.visibility_timeout,
            ))),
            Some(ScriptedReceive::Empty) | None => Ok(None),
            Some(ScriptedReceive::Error(msg)) => {
                Err(ConsumeError::transient(QueueOperation::Receive, msg))
            }
            Some(ScriptedReceive::PermanentError(msg)) => {
                Err(ConsumeError::permanent(QueueOperation::Receive, msg))
            }
        };

        Box::pin(async move { result })
    }

    fn delete<'a>(&'a mut self, lease: &'a MessageLease) -> QueueFuture<'a, ()> {
        let handle = lease.receipt_handle().as_str().to_string();
        let mut state = self.state.lock().unwrap();
        state.calls.push(QueueCall::Delete(handle.clone()));

        let result = if state.failing_deletes.contains(&handle) {
            Err(ConsumeError::permanent(
                QueueOperation::Delete,
                format!("receipt handle '{handle}' has expired"),
            ))
        } else {
            Ok(())
        };

        Box::pin(async move { result })
    }

    fn change_visibility<'a>(
        &'a mut self,
        lease: &'a mut MessageLease,
        timeout: Duration,
    ) -> QueueFuture<'a, ()> {
        let handle = lease.receipt_handle().as_str().to_string();
        self.state
            .lock()
            .unwrap()
            .calls
            .push(QueueCall::ChangeVisibility(handle, timeout));
        lease.reset_visibility(tokio::time::Instant::now(), timeout);

        Box::pin(async move { Ok(()) })
    }
}

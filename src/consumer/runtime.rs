// src/consumer/runtime.rs

use std::fmt;

use tokio::time::Instant;
use tracing::{debug, info};

use crate::config::ConsumerConfig;
use crate::errors::Result;
use crate::exec::CommandInvoker;
use crate::queue::{QueueClient, ReceiveOptions, RetryPolicy, receive_with_retry};

use super::core::ConsumerCore;
use super::{ConsumerCommand, ConsumerEvent, DrainSummary};

/// Drives the consumer core, performing the queue calls and command
/// invocations it asks for.
///
/// Strictly sequential: one receive, then one invocation, then at most one
/// delete. No queue call is made while a command is running.
pub struct Consumer<Q: QueueClient, I: CommandInvoker> {
    core: ConsumerCore,
    queue: Q,
    invoker: I,
    receive: ReceiveOptions,
    retry: RetryPolicy,
}

impl<Q: QueueClient, I: CommandInvoker> fmt::Debug for Consumer<Q, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Consumer")
            .field("core", &self.core)
            .field("receive", &self.receive)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl<Q: QueueClient, I: CommandInvoker> Consumer<Q, I> {
    /// Build a consumer from resolved configuration.
    pub fn new(config: ConsumerConfig, queue: Q, invoker: I) -> Self {
        let receive = config.receive_options();
        let retry = config.retry().clone();
        let core = ConsumerCore::new(config.command().to_vec());
        Self::from_parts(core, queue, invoker, receive, retry)
    }

    pub fn from_parts(
        core: ConsumerCore,
        queue: Q,
        invoker: I,
        receive: ReceiveOptions,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            core,
            queue,
            invoker,
            receive,
            retry,
        }
    }

    /// Main loop: run until a receive comes back empty.
    ///
    /// Returns an error only when the queue stays unreachable after the retry
    /// policy is exhausted. Command failures and delete failures are logged
    /// and absorbed.
    pub async fn run(mut self) -> Result<DrainSummary> {
        info!(
            visibility_timeout_s = self.receive.visibility_timeout.as_secs(),
            wait_time_s = self.receive.wait_time.as_secs(),
            "consumer started"
        );

        let mut command = self.core.start();

        loop {
            let event = match command {
                ConsumerCommand::Poll => {
                    let lease =
                        receive_with_retry(&mut self.queue, self.receive, &self.retry).await?;
                    ConsumerEvent::Received(lease)
                }
                ConsumerCommand::Invoke { lease, request } => {
                    debug!(message_id = lease.display_id(), argv = ?request.argv(), "invoking");
                    let outcome = self.invoker.invoke(request).await;
                    ConsumerEvent::Invoked { lease, outcome }
                }
                ConsumerCommand::Delete(lease) => {
                    let result = self
                        .queue
                        .delete(&lease)
                        .await
                        .map_err(|e| e.to_string());
                    ConsumerEvent::Deleted { lease, result }
                }
                ConsumerCommand::Exit => break,
            };

            command = self.core.step(event, Instant::now());
        }

        let summary = self.core.summary();
        info!(
            received = summary.received,
            succeeded = summary.succeeded,
            failed = summary.failed,
            deleted = summary.deleted,
            delete_failures = summary.delete_failures,
            "consumer finished"
        );
        Ok(summary)
    }
}

// src/consumer/core.rs

//! Pure consumer state machine.
//!
//! Consumes [`ConsumerEvent`]s and answers with the next [`ConsumerCommand`].
//! It has no queue client, no processes and no Tokio tasks; the current time
//! is passed in so lease expiry is deterministic under test.

use tokio::time::Instant;

use crate::consumer::handlers::{handle_deleted, handle_invoked, handle_received};
use crate::consumer::{ConsumerCommand, ConsumerEvent, ConsumerState, DrainSummary};

#[derive(Debug)]
pub struct ConsumerCore {
    command: Vec<String>,
    state: ConsumerState,
    summary: DrainSummary,
}

impl ConsumerCore {
    pub fn new(command: Vec<String>) -> Self {
        Self {
            command,
            state: ConsumerState::Polling,
            summary: DrainSummary::default(),
        }
    }

    pub fn state(&self) -> ConsumerState {
        self.state
    }

    pub fn summary(&self) -> DrainSummary {
        self.summary
    }

    /// First command of a run.
    pub fn start(&self) -> ConsumerCommand {
        match self.state {
            ConsumerState::Polling => ConsumerCommand::Poll,
            ConsumerState::DrainingComplete => ConsumerCommand::Exit,
        }
    }

    /// Handle a single event, updating state and returning what to do next.
    pub fn step(&mut self, event: ConsumerEvent, now: Instant) -> ConsumerCommand {
        if self.state == ConsumerState::DrainingComplete {
            return ConsumerCommand::Exit;
        }

        match event {
            ConsumerEvent::Received(lease) => {
                handle_received(&mut self.state, &mut self.summary, &self.command, lease)
            }
            ConsumerEvent::Invoked { lease, outcome } => {
                handle_invoked(&mut self.summary, &self.command, lease, outcome, now)
            }
            ConsumerEvent::Deleted { lease, result } => {
                handle_deleted(&mut self.summary, lease, result)
            }
        }
    }
}

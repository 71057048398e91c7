// src/queue/lease.rs

//! A single in-flight delivery.

use std::time::Duration;

use tokio::time::Instant;

use crate::types::ReceiptHandle;

/// One dequeued message together with its processing deadline.
///
/// A lease is created by a successful receive and is only actionable while
/// its receipt handle is valid. Once `visibility_deadline` passes the queue
/// may hand the same message to another consumer under a new handle, and
/// deleting through this lease may fail.
///
/// There is no explicit "abandon": dropping a lease simply lets it expire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageLease {
    payload: String,
    receipt_handle: ReceiptHandle,
    message_id: Option<String>,
    received_at: Instant,
    visibility_deadline: Instant,
}

impl MessageLease {
    /// Create a lease received just now with the given visibility timeout.
    pub fn new(
        payload: impl Into<String>,
        receipt_handle: impl Into<ReceiptHandle>,
        message_id: Option<String>,
        visibility_timeout: Duration,
    ) -> Self {
        Self::received_at(
            payload,
            receipt_handle,
            message_id,
            Instant::now(),
            visibility_timeout,
        )
    }

    pub fn received_at(
        payload: impl Into<String>,
        receipt_handle: impl Into<ReceiptHandle>,
        message_id: Option<String>,
        received_at: Instant,
        visibility_timeout: Duration,
    ) -> Self {
        Self {
            payload: payload.into(),
            receipt_handle: receipt_handle.into(),
            message_id,
            received_at,
            visibility_deadline: received_at + visibility_timeout,
        }
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn receipt_handle(&self) -> &ReceiptHandle {
        &self.receipt_handle
    }

    pub fn message_id(&self) -> Option<&str> {
        self.message_id.as_deref()
    }

    /// Message id for log lines; `"unknown"` when the queue didn't supply one.
    pub fn display_id(&self) -> &str {
        self.message_id.as_deref().unwrap_or("unknown")
    }

    pub fn received(&self) -> Instant {
        self.received_at
    }

    pub fn visibility_deadline(&self) -> Instant {
        self.visibility_deadline
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.visibility_deadline
    }

    /// Time left before the message becomes visible again (zero if expired).
    pub fn remaining(&self, now: Instant) -> Duration {
        self.visibility_deadline.saturating_duration_since(now)
    }

    /// Record a visibility change the queue has accepted.
    ///
    /// Queue clients call this after a successful change-visibility request;
    /// the new deadline counts from `now`, not from the original receive.
    pub fn reset_visibility(&mut self, now: Instant, timeout: Duration) {
        self.visibility_deadline = now + timeout;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deadline_is_receive_time_plus_timeout() {
        let t0 = Instant::now();
        let lease =
            MessageLease::received_at("m1", "h1", None, t0, Duration::from_secs(30));

        assert_eq!(lease.visibility_deadline(), t0 + Duration::from_secs(30));
        assert!(!lease.is_expired(t0 + Duration::from_secs(29)));
        assert!(lease.is_expired(t0 + Duration::from_secs(30)));
        assert_eq!(lease.remaining(t0 + Duration::from_secs(10)), Duration::from_secs(20));
        assert_eq!(lease.remaining(t0 + Duration::from_secs(45)), Duration::ZERO);
        assert_eq!(lease.display_id(), "unknown");
    }

    #[test]
    fn reset_visibility_counts_from_now() {
        let t0 = Instant::now();
        let mut lease = MessageLease::received_at(
            "m1",
            "h1",
            Some("id-1".to_string()),
            t0,
            Duration::from_secs(5),
        );

        lease.reset_visibility(t0 + Duration::from_secs(4), Duration::from_secs(60));

        assert_eq!(lease.visibility_deadline(), t0 + Duration::from_secs(64));
        assert_eq!(lease.received(), t0);
        assert_eq!(lease.display_id(), "id-1");
    }
}

// src/config/model.rs

use std::time::Duration;

use serde::Deserialize;

use crate::queue::{ReceiveOptions, RetryPolicy};

pub const DEFAULT_MESSAGE_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_WAIT_TIME_SECS: u64 = 1;

/// Largest visibility timeout SQS accepts (12 hours).
pub const MAX_MESSAGE_TIMEOUT_SECS: u64 = 43_200;
/// Longest long-poll window SQS accepts.
pub const MAX_WAIT_TIME_SECS: u64 = 20;

/// Unvalidated configuration, as read from a TOML file and then overlaid with
/// environment and CLI values.
///
/// ```toml
/// queue_url = "https://sqs.ap-southeast-2.amazonaws.com/123456789012/datasets"
/// message_timeout = 600
/// wait_time = 5
/// command = ["index-dataset", "--env", "prod"]
///
/// [retry]
/// max_attempts = 5
/// base_delay_ms = 1000
/// ```
///
/// All keys are optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    pub queue_url: Option<String>,

    /// Visibility timeout in seconds.
    pub message_timeout: Option<u64>,

    /// Long-poll window in seconds.
    pub wait_time: Option<u64>,

    pub endpoint_url: Option<String>,

    #[serde(default)]
    pub command: Vec<String>,

    #[serde(default)]
    pub retry: RetrySection,
}

/// `[retry]` section: backoff for failing receive calls.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetrySection {
    pub max_attempts: Option<u32>,
    pub base_delay_ms: Option<u64>,
    pub multiplier: Option<f64>,
    pub max_delay_ms: Option<u64>,
}

/// Fully resolved, validated configuration.
///
/// Built once at startup and moved into the consumer; nothing inside the
/// loop reads the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsumerConfig {
    queue_url: String,
    message_timeout: Duration,
    wait_time: Duration,
    endpoint_url: Option<String>,
    command: Vec<String>,
    retry: RetryPolicy,
}

impl ConsumerConfig {
    /// Used by validation, which has already checked every invariant.
    pub(crate) fn new_unchecked(
        queue_url: String,
        message_timeout: Duration,
        wait_time: Duration,
        endpoint_url: Option<String>,
        command: Vec<String>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            queue_url,
            message_timeout,
            wait_time,
            endpoint_url,
            command,
            retry,
        }
    }

    pub fn queue_url(&self) -> &str {
        &self.queue_url
    }

    pub fn message_timeout(&self) -> Duration {
        self.message_timeout
    }

    pub fn wait_time(&self) -> Duration {
        self.wait_time
    }

    pub fn endpoint_url(&self) -> Option<&str> {
        self.endpoint_url.as_deref()
    }

    /// Base command; never empty.
    pub fn command(&self) -> &[String] {
        &self.command
    }

    pub fn retry(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Options passed to every receive call. The visibility timeout is the
    /// configured message timeout, unmodified.
    pub fn receive_options(&self) -> ReceiveOptions {
        ReceiveOptions {
            wait_time: self.wait_time,
            visibility_timeout: self.message_timeout,
        }
    }
}

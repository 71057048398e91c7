#![allow(dead_code)]

use sqs_consume::config::{ConsumerConfig, RawConfigFile};

/// Builder for `ConsumerConfig` to simplify test setup.
///
/// Defaults to a dummy queue URL and a zero-delay retry policy so tests never
/// sleep.
pub struct ConsumerConfigBuilder {
    config: RawConfigFile,
}

impl ConsumerConfigBuilder {
    pub fn new(command: &[&str]) -> Self {
        let mut config = RawConfigFile {
            queue_url: Some("https://sqs.test.local/000000000000/test-queue".to_string()),
            command: command.iter().map(|s| s.to_string()).collect(),
            ..RawConfigFile::default()
        };
        config.retry.base_delay_ms = Some(0);
        config.retry.max_delay_ms = Some(0);
        Self { config }
    }

    pub fn queue_url(mut self, url: &str) -> Self {
        self.config.queue_url = Some(url.to_string());
        self
    }

    pub fn message_timeout(mut self, secs: u64) -> Self {
        self.config.message_timeout = Some(secs);
        self
    }

    pub fn wait_time(mut self, secs: u64) -> Self {
        self.config.wait_time = Some(secs);
        self
    }

    pub fn max_receive_attempts(mut self, n: u32) -> Self {
        self.config.retry.max_attempts = Some(n);
        self
    }

    pub fn build(self) -> ConsumerConfig {
        ConsumerConfig::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

// src/config/validate.rs

use std::time::Duration;

use crate::config::model::{
    ConsumerConfig, DEFAULT_MESSAGE_TIMEOUT_SECS, DEFAULT_WAIT_TIME_SECS,
    MAX_MESSAGE_TIMEOUT_SECS, MAX_WAIT_TIME_SECS, RawConfigFile, RetrySection,
};
use crate::errors::{ConsumeError, Result};
use crate::queue::RetryPolicy;

impl TryFrom<RawConfigFile> for ConsumerConfig {
    type Error = ConsumeError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let queue_url = validate_queue_url(raw.queue_url)?;
        validate_command(&raw.command)?;

        let message_timeout = raw.message_timeout.unwrap_or(DEFAULT_MESSAGE_TIMEOUT_SECS);
        if message_timeout > MAX_MESSAGE_TIMEOUT_SECS {
            return Err(config_error(format!(
                "message timeout must be <= {MAX_MESSAGE_TIMEOUT_SECS} seconds (got {message_timeout})"
            )));
        }

        let wait_time = raw.wait_time.unwrap_or(DEFAULT_WAIT_TIME_SECS);
        if wait_time > MAX_WAIT_TIME_SECS {
            return Err(config_error(format!(
                "wait time must be <= {MAX_WAIT_TIME_SECS} seconds (got {wait_time})"
            )));
        }

        let endpoint_url = raw.endpoint_url.filter(|u| !u.trim().is_empty());
        let retry = validate_retry(&raw.retry)?;

        Ok(ConsumerConfig::new_unchecked(
            queue_url,
            Duration::from_secs(message_timeout),
            Duration::from_secs(wait_time),
            endpoint_url,
            raw.command,
            retry,
        ))
    }
}

fn config_error(msg: impl Into<String>) -> ConsumeError {
    ConsumeError::ConfigError(msg.into())
}

fn validate_queue_url(url: Option<String>) -> Result<String> {
    match url {
        Some(url) if !url.trim().is_empty() => Ok(url.trim().to_string()),
        _ => Err(config_error(
            "no queue URL given: pass --queue-url or set QUEUE_URL",
        )),
    }
}

fn validate_command(command: &[String]) -> Result<()> {
    match command.first() {
        None => Err(config_error(
            "no command given: pass the command to run for each message",
        )),
        Some(program) if program.trim().is_empty() => {
            Err(config_error("command program must not be empty"))
        }
        Some(_) => Ok(()),
    }
}

fn validate_retry(section: &RetrySection) -> Result<RetryPolicy> {
    let defaults = RetryPolicy::default();

    let max_attempts = section.max_attempts.unwrap_or(defaults.max_attempts);
    if max_attempts == 0 {
        return Err(config_error("retry.max_attempts must be >= 1 (got 0)"));
    }

    let multiplier = section.multiplier.unwrap_or(defaults.multiplier);
    if !multiplier.is_finite() || multiplier < 1.0 {
        return Err(config_error(format!(
            "retry.multiplier must be a finite number >= 1.0 (got {multiplier})"
        )));
    }

    Ok(RetryPolicy {
        max_attempts,
        base_delay: section
            .base_delay_ms
            .map(Duration::from_millis)
            .unwrap_or(defaults.base_delay),
        multiplier,
        max_delay: section
            .max_delay_ms
            .map(Duration::from_millis)
            .unwrap_or(defaults.max_delay),
    })
}

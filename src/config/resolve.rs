// src/config/resolve.rs

//! Layering of CLI flags, environment and config file.
//!
//! Precedence per field: CLI flag > environment > config file > default.
//! Only the queue URL has an environment fallback (`QUEUE_URL`).
//!
//! The environment is read through a caller-supplied lookup so resolution is
//! a pure function of its inputs.

use crate::cli::CliArgs;
use crate::config::loader::load_from_path;
use crate::config::model::{ConsumerConfig, RawConfigFile};
use crate::errors::Result;

/// Environment variable consulted when no queue URL flag is given.
pub const QUEUE_URL_ENV: &str = "QUEUE_URL";

/// Values given explicitly on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub queue_url: Option<String>,
    pub message_timeout: Option<u64>,
    pub wait_time: Option<u64>,
    pub max_receive_attempts: Option<u32>,
    pub endpoint_url: Option<String>,
    pub command: Vec<String>,
}

impl From<&CliArgs> for Overrides {
    fn from(args: &CliArgs) -> Self {
        Self {
            queue_url: args.queue_url.clone(),
            message_timeout: args.message_timeout,
            wait_time: args.wait_time,
            max_receive_attempts: args.max_receive_attempts,
            endpoint_url: args.endpoint_url.clone(),
            command: args.command.clone(),
        }
    }
}

/// Merge all layers and validate the result.
pub fn resolve<F>(overrides: Overrides, file: Option<RawConfigFile>, env: F) -> Result<ConsumerConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut raw = file.unwrap_or_default();

    if let Some(url) = env(QUEUE_URL_ENV).filter(|v| !v.trim().is_empty()) {
        raw.queue_url = Some(url);
    }

    if overrides.queue_url.is_some() {
        raw.queue_url = overrides.queue_url;
    }
    if overrides.message_timeout.is_some() {
        raw.message_timeout = overrides.message_timeout;
    }
    if overrides.wait_time.is_some() {
        raw.wait_time = overrides.wait_time;
    }
    if overrides.max_receive_attempts.is_some() {
        raw.retry.max_attempts = overrides.max_receive_attempts;
    }
    if overrides.endpoint_url.is_some() {
        raw.endpoint_url = overrides.endpoint_url;
    }
    if !overrides.command.is_empty() {
        raw.command = overrides.command;
    }

    ConsumerConfig::try_from(raw)
}

/// Resolve configuration for the binary: read `--config` if given, then
/// layer the CLI and environment on top.
pub fn resolve_from_args<F>(args: &CliArgs, env: F) -> Result<ConsumerConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let file = args.config.as_deref().map(load_from_path).transpose()?;
    resolve(Overrides::from(args), file, env)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ConsumeError;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn command(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn env_supplies_queue_url_when_flag_absent() {
        let overrides = Overrides {
            command: command(&["handler.sh"]),
            ..Overrides::default()
        };
        let cfg = resolve(overrides, None, |key| {
            (key == QUEUE_URL_ENV).then(|| "https://env/queue".to_string())
        })
        .expect("valid");

        assert_eq!(cfg.queue_url(), "https://env/queue");
    }

    #[test]
    fn flag_beats_env_beats_file() {
        let file = RawConfigFile {
            queue_url: Some("https://file/queue".to_string()),
            message_timeout: Some(90),
            command: command(&["from-file"]),
            ..RawConfigFile::default()
        };
        let env = |_: &str| Some("https://env/queue".to_string());

        let cfg = resolve(Overrides::default(), Some(file.clone()), env).expect("valid");
        assert_eq!(cfg.queue_url(), "https://env/queue");
        assert_eq!(cfg.command(), command(&["from-file"]).as_slice());
        assert_eq!(cfg.message_timeout().as_secs(), 90);

        let overrides = Overrides {
            queue_url: Some("https://flag/queue".to_string()),
            message_timeout: Some(5),
            command: command(&["from-cli", "-v"]),
            ..Overrides::default()
        };
        let cfg = resolve(overrides, Some(file), env).expect("valid");
        assert_eq!(cfg.queue_url(), "https://flag/queue");
        assert_eq!(cfg.command(), command(&["from-cli", "-v"]).as_slice());
        assert_eq!(cfg.message_timeout().as_secs(), 5);
    }

    #[test]
    fn missing_queue_url_everywhere_is_a_config_error() {
        let overrides = Overrides {
            command: command(&["handler.sh"]),
            ..Overrides::default()
        };
        let err = resolve(overrides, None, no_env).unwrap_err();
        assert!(matches!(err, ConsumeError::ConfigError(_)));
    }

    #[test]
    fn empty_env_value_counts_as_unset() {
        let overrides = Overrides {
            command: command(&["handler.sh"]),
            ..Overrides::default()
        };
        let err = resolve(overrides, None, |_| Some(String::new())).unwrap_err();
        assert!(matches!(err, ConsumeError::ConfigError(_)));
    }

    #[test]
    fn max_receive_attempts_flag_sets_retry_policy() {
        let overrides = Overrides {
            queue_url: Some("https://q".to_string()),
            max_receive_attempts: Some(9),
            command: command(&["handler.sh"]),
            ..Overrides::default()
        };
        let cfg = resolve(overrides, None, no_env).expect("valid");
        assert_eq!(cfg.retry().max_attempts, 9);
    }
}

// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! Every option here is optional at parse time; missing values fall back to
//! the environment, then to the config file, then to built-in defaults (see
//! [`crate::config::resolve`]). Required-ness is enforced by config
//! validation so the error message is the same whichever layer left it out.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `sqs-consume`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "sqs-consume",
    version,
    about = "Drain a queue, running a command once per message and deleting it on success.",
    long_about = None
)]
pub struct CliArgs {
    /// How long (seconds) a received message stays hidden while it is processed.
    ///
    /// Becomes the visibility timeout requested on every receive. Default: 30.
    #[arg(long, value_name = "SECS")]
    pub message_timeout: Option<u64>,

    /// URL of the queue to drain.
    ///
    /// Defaults to the `QUEUE_URL` environment variable.
    #[arg(short = 'q', long, value_name = "URL")]
    pub queue_url: Option<String>,

    /// Long-poll window (seconds, 0-20) for each receive. Default: 1.
    #[arg(long, value_name = "SECS")]
    pub wait_time: Option<u64>,

    /// Receive attempts before a persistent queue error aborts the run. Default: 5.
    #[arg(long, value_name = "N")]
    pub max_receive_attempts: Option<u32>,

    /// Override the SQS endpoint, e.g. a local emulator.
    #[arg(long, value_name = "URL")]
    pub endpoint_url: Option<String>,

    /// Optional TOML file supplying defaults for any of the above.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SQS_CONSUME_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve and validate configuration, print it, but don't touch the queue.
    #[arg(long)]
    pub dry_run: bool,

    /// Command used to process messages. The message body is appended as its
    /// final argument.
    #[arg(
        value_name = "COMMAND",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub command: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

// src/lib.rs

pub mod cli;
pub mod config;
pub mod consumer;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod queue;
pub mod types;

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{ConsumerConfig, resolve_from_args};
use crate::consumer::{Consumer, DrainSummary};
use crate::exec::ProcessInvoker;
use crate::queue::SqsQueue;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config resolution (CLI, `QUEUE_URL`, optional TOML file)
/// - the SQS queue client
/// - the process invoker
/// - the consumer loop, which drains the queue once and returns
pub async fn run(args: CliArgs) -> Result<()> {
    // All environment lookups happen here, once.
    let config = resolve_from_args(&args, |key| std::env::var(key).ok())?;

    if args.dry_run {
        print_dry_run(&config);
        return Ok(());
    }

    info!(queue_url = %config.queue_url(), "receiving messages");

    let queue = SqsQueue::from_env(config.queue_url(), config.endpoint_url()).await;
    let summary = drain(config, queue, ProcessInvoker::new()).await?;

    debug!(?summary, "drain complete");
    Ok(())
}

/// Drain `queue` with the given invoker until a receive comes back empty.
pub async fn drain<Q, I>(config: ConsumerConfig, queue: Q, invoker: I) -> errors::Result<DrainSummary>
where
    Q: queue::QueueClient,
    I: exec::CommandInvoker,
{
    Consumer::new(config, queue, invoker).run().await
}

/// Simple dry-run output: print the resolved configuration.
fn print_dry_run(cfg: &ConsumerConfig) {
    println!("sqs-consume dry-run");
    println!("  queue_url = {}", cfg.queue_url());
    println!("  message_timeout = {}s", cfg.message_timeout().as_secs());
    println!("  wait_time = {}s", cfg.wait_time().as_secs());
    if let Some(endpoint) = cfg.endpoint_url() {
        println!("  endpoint_url = {endpoint}");
    }
    println!("  command = {:?} <message body>", cfg.command());

    let retry = cfg.retry();
    println!(
        "  retry = {} attempts, base {:?}, x{}, max {:?}",
        retry.max_attempts, retry.base_delay, retry.multiplier, retry.max_delay
    );

    debug!("dry-run complete (no queue access)");
}

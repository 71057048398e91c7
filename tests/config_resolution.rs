// tests/config_resolution.rs

use std::error::Error;
use std::io::Write;
use std::time::Duration;

use clap::Parser;
use tempfile::NamedTempFile;

use sqs_consume::cli::CliArgs;
use sqs_consume::config::{QUEUE_URL_ENV, load_and_validate, resolve_from_args};
use sqs_consume::errors::ConsumeError;
use sqs_consume_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

fn no_env(_: &str) -> Option<String> {
    None
}

fn config_file(contents: &str) -> Result<NamedTempFile, Box<dyn Error>> {
    let mut file = NamedTempFile::new()?;
    write!(file, "{contents}")?;
    Ok(file)
}

#[test]
fn full_config_file_is_loaded() -> TestResult {
    init_tracing();

    let file = config_file(
        r#"
queue_url = "https://sqs.ap-southeast-2.amazonaws.com/123456789012/datasets"
message_timeout = 600
wait_time = 10
endpoint_url = "http://localhost:4566"
command = ["index-dataset", "--env", "prod"]

[retry]
max_attempts = 8
base_delay_ms = 250
multiplier = 3.0
max_delay_ms = 10000
"#,
    )?;

    let cfg = load_and_validate(file.path())?;

    assert_eq!(
        cfg.queue_url(),
        "https://sqs.ap-southeast-2.amazonaws.com/123456789012/datasets"
    );
    assert_eq!(cfg.message_timeout(), Duration::from_secs(600));
    assert_eq!(cfg.wait_time(), Duration::from_secs(10));
    assert_eq!(cfg.endpoint_url(), Some("http://localhost:4566"));
    assert_eq!(cfg.command(), ["index-dataset", "--env", "prod"]);
    assert_eq!(cfg.retry().max_attempts, 8);
    assert_eq!(cfg.retry().base_delay, Duration::from_millis(250));
    assert_eq!(cfg.retry().multiplier, 3.0);
    assert_eq!(cfg.retry().max_delay, Duration::from_secs(10));
    assert_eq!(cfg.receive_options().visibility_timeout, Duration::from_secs(600));

    Ok(())
}

#[test]
fn unknown_keys_are_rejected() -> TestResult {
    let file = config_file(
        r#"
queue_url = "https://q"
command = ["x"]
visibility = 10
"#,
    )?;

    match load_and_validate(file.path()) {
        Err(ConsumeError::TomlError(_)) => Ok(()),
        other => panic!("expected TomlError, got {other:?}"),
    }
}

#[test]
fn cli_overrides_file_values() -> TestResult {
    let file = config_file(
        r#"
queue_url = "https://file/queue"
message_timeout = 600
command = ["from-file"]
"#,
    )?;
    let path = file.path().to_string_lossy().into_owned();

    let args = CliArgs::try_parse_from([
        "sqs-consume",
        "--config",
        path.as_str(),
        "--message-timeout",
        "45",
        "handler.sh",
        "--dry",
    ])?;
    let cfg = resolve_from_args(&args, no_env)?;

    assert_eq!(cfg.queue_url(), "https://file/queue");
    assert_eq!(cfg.message_timeout(), Duration::from_secs(45));
    assert_eq!(cfg.command(), ["handler.sh", "--dry"]);

    Ok(())
}

#[test]
fn queue_url_falls_back_to_environment() -> TestResult {
    let args = CliArgs::try_parse_from(["sqs-consume", "handler.sh"])?;
    let cfg = resolve_from_args(&args, |key| {
        (key == QUEUE_URL_ENV).then(|| "https://env/queue".to_string())
    })?;

    assert_eq!(cfg.queue_url(), "https://env/queue");
    assert_eq!(cfg.message_timeout(), Duration::from_secs(30));

    Ok(())
}

#[test]
fn missing_queue_url_without_env_default_is_a_config_error() -> TestResult {
    let args = CliArgs::try_parse_from(["sqs-consume", "handler.sh"])?;

    match resolve_from_args(&args, no_env) {
        Err(ConsumeError::ConfigError(msg)) => {
            assert!(msg.contains("QUEUE_URL"));
            Ok(())
        }
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn missing_command_is_a_config_error() -> TestResult {
    let args = CliArgs::try_parse_from(["sqs-consume", "-q", "https://q"])?;

    match resolve_from_args(&args, no_env) {
        Err(ConsumeError::ConfigError(msg)) => {
            assert!(msg.contains("no command"));
            Ok(())
        }
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn missing_config_file_is_an_io_error() -> TestResult {
    let args = CliArgs::try_parse_from([
        "sqs-consume",
        "--config",
        "/definitely/not/here.toml",
        "handler.sh",
    ])?;

    match resolve_from_args(&args, no_env) {
        Err(ConsumeError::IoError(_)) => Ok(()),
        other => panic!("expected IoError, got {other:?}"),
    }
}

/// Sanity-check that configs/sqs-consume.toml stays loadable.
#[test]
fn bundled_example_config_is_valid() -> TestResult {
    let manifest_dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let cfg = load_and_validate(manifest_dir.join("configs/sqs-consume.toml"))?;

    assert_eq!(cfg.message_timeout(), Duration::from_secs(300));
    assert_eq!(cfg.wait_time(), Duration::from_secs(5));
    assert_eq!(cfg.command(), ["index-dataset", "--env", "dev"]);

    Ok(())
}

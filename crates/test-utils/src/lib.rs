pub mod builders;
pub mod fake_invoker;
pub mod scripted_queue;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

static INIT: Once = Once::new();

/// Longest a single drain may take in a test. Every scripted queue ends in
/// an empty receive, so a drain that outlives this is stuck.
pub const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Install a tracing subscriber for the test binary, once.
///
/// Output goes through the test writer and only shows up for failing tests.
/// `RUST_LOG` picks the levels; without it the consumer logs at `debug` and
/// everything else (the AWS SDK included) at `warn`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("warn,sqs_consume=debug"));

        // Another harness may already own the global subscriber.
        let _ = fmt().with_env_filter(filter).with_test_writer().try_init();
    });
}

/// Await `f`, failing the test if it runs past [`DRAIN_TIMEOUT`].
pub async fn with_timeout<F: Future>(f: F) -> F::Output {
    tokio::time::timeout(DRAIN_TIMEOUT, f)
        .await
        .expect("drain did not reach an empty receive in time")
}

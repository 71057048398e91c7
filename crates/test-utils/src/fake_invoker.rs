use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use sqs_consume::exec::{
    CommandInvoker, InvocationFailure, InvocationOutcome, InvocationRequest, InvokeFuture,
};

/// A fake invoker that:
/// - records the argv of every invocation
/// - answers with scripted outcomes, then with a fallback once the script
///   runs out.
///
/// Clones share the same recording, so a test can keep one and hand the
/// other to the consumer.
#[derive(Debug, Clone)]
pub struct RecordingInvoker {
    invocations: Arc<Mutex<Vec<Vec<String>>>>,
    script: Arc<Mutex<VecDeque<InvocationOutcome>>>,
    fallback: InvocationOutcome,
}

impl RecordingInvoker {
    /// Every invocation succeeds.
    pub fn succeeding() -> Self {
        Self::with_fallback(InvocationOutcome::Success)
    }

    /// Every invocation exits with `code`.
    pub fn failing(code: i32) -> Self {
        Self::with_fallback(InvocationOutcome::Failed(InvocationFailure::NonZeroExit(code)))
    }

    pub fn with_fallback(fallback: InvocationOutcome) -> Self {
        Self {
            invocations: Arc::default(),
            script: Arc::default(),
            fallback,
        }
    }

    /// Answer the next invocations with `outcomes`, in order.
    pub fn then(self, outcomes: impl IntoIterator<Item = InvocationOutcome>) -> Self {
        self.script.lock().unwrap().extend(outcomes);
        self
    }

    pub fn invocations(&self) -> Vec<Vec<String>> {
        self.invocations.lock().unwrap().clone()
    }

    /// Payloads seen, i.e. the final argument of each invocation.
    pub fn payloads(&self) -> Vec<String> {
        self.invocations()
            .into_iter()
            .filter_map(|argv| argv.last().cloned())
            .collect()
    }
}

impl CommandInvoker for RecordingInvoker {
    fn invoke(&mut self, request: InvocationRequest) -> InvokeFuture<'_> {
        let argv = request.argv().into_iter().map(str::to_string).collect();
        self.invocations.lock().unwrap().push(argv);

        let outcome = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());

        Box::pin(async move { outcome })
    }
}

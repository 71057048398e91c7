// tests/property_consumer.rs

use proptest::prelude::*;

use sqs_consume::drain;
use sqs_consume::exec::{InvocationFailure, InvocationOutcome, InvocationRequest};
use sqs_consume_test_utils::builders::ConsumerConfigBuilder;
use sqs_consume_test_utils::fake_invoker::RecordingInvoker;
use sqs_consume_test_utils::scripted_queue::ScriptedQueue;

fn token() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_./-]{1,12}"
}

proptest! {
    #[test]
    fn argv_is_command_then_payload(
        command in proptest::collection::vec(token(), 1..6),
        payload in ".*",
    ) {
        let req = InvocationRequest::new(command.clone(), payload.clone());
        let mut expected: Vec<&str> = command.iter().map(String::as_str).collect();
        expected.push(payload.as_str());

        prop_assert_eq!(req.argv(), expected);
    }

    #[test]
    fn exactly_the_successful_deliveries_are_deleted(
        outcomes in proptest::collection::vec(any::<bool>(), 0..20),
    ) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .expect("runtime");

        let mut queue = ScriptedQueue::new();
        for i in 0..outcomes.len() {
            queue = queue.message(&format!("m{i}"), &format!("h{i}"));
        }
        let invoker = RecordingInvoker::succeeding().then(outcomes.iter().map(|ok| {
            if *ok {
                InvocationOutcome::Success
            } else {
                InvocationOutcome::Failed(InvocationFailure::NonZeroExit(1))
            }
        }));
        let cfg = ConsumerConfigBuilder::new(&["handler.sh"]).build();

        let summary = rt
            .block_on(drain(cfg, queue.clone(), invoker.clone()))
            .expect("drain");

        let expected_deletes: Vec<String> = outcomes
            .iter()
            .enumerate()
            .filter(|(_, ok)| **ok)
            .map(|(i, _)| format!("h{i}"))
            .collect();
        let expected_payloads: Vec<String> =
            (0..outcomes.len()).map(|i| format!("m{i}")).collect();

        prop_assert_eq!(queue.deleted_handles(), expected_deletes);
        prop_assert_eq!(queue.receive_calls().len(), outcomes.len() + 1);
        prop_assert_eq!(invoker.payloads(), expected_payloads);
        prop_assert_eq!(summary.received as usize, outcomes.len());
        prop_assert_eq!(summary.failed as usize, outcomes.iter().filter(|ok| !**ok).count());
    }
}

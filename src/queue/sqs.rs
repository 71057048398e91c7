// src/queue/sqs.rs

//! Amazon SQS implementation of [`QueueClient`].

use std::time::Duration;

use aws_sdk_sqs::Client;
use aws_sdk_sqs::config::http::HttpResponse;
use aws_sdk_sqs::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_sqs::types::Message;
use tracing::{debug, warn};

use crate::errors::{ConsumeError, Result};
use crate::queue::{MessageLease, QueueClient, QueueFuture, ReceiveOptions};
use crate::types::QueueOperation;

/// Queue client for a single SQS queue URL.
#[derive(Debug, Clone)]
pub struct SqsQueue {
    client: Client,
    queue_url: String,
}

impl SqsQueue {
    pub fn new(client: Client, queue_url: impl Into<String>) -> Self {
        Self {
            client,
            queue_url: queue_url.into(),
        }
    }

    /// Build a client from the standard AWS environment (credentials chain,
    /// region, profile), optionally pointing it at a different endpoint.
    pub async fn from_env(queue_url: impl Into<String>, endpoint_url: Option<&str>) -> Self {
        let mut loader = aws_config::from_env();
        if let Some(endpoint) = endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;
        Self::new(Client::new(&sdk_config), queue_url)
    }
}

/// Parameters of one `ReceiveMessage` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ReceiveRequest {
    max_messages: i32,
    visibility_timeout: i32,
    wait_time: i32,
}

impl ReceiveRequest {
    fn from_options(options: ReceiveOptions) -> Result<Self> {
        let op = QueueOperation::Receive;
        Ok(Self {
            max_messages: ReceiveOptions::MAX_MESSAGES,
            visibility_timeout: whole_seconds(op, "visibility timeout", options.visibility_timeout)?,
            wait_time: whole_seconds(op, "wait time", options.wait_time)?,
        })
    }
}

/// SQS takes whole seconds as `i32`.
fn whole_seconds(operation: QueueOperation, what: &str, d: Duration) -> Result<i32> {
    i32::try_from(d.as_secs()).map_err(|_| {
        ConsumeError::permanent(operation, format!("{what} of {d:?} does not fit the SQS API"))
    })
}

/// Turn a received SQS message into a lease. A missing body is an empty
/// payload; a missing receipt handle makes the message unusable.
fn lease_from_message(message: &Message, visibility_timeout: Duration) -> Result<MessageLease> {
    let message_id = message.message_id();
    let Some(handle) = message.receipt_handle() else {
        warn!(
            message_id = message_id.unwrap_or("unknown"),
            "received message without a receipt handle"
        );
        return Err(ConsumeError::permanent(
            QueueOperation::Receive,
            "message has no receipt handle",
        ));
    };

    Ok(MessageLease::new(
        message.body().unwrap_or_default(),
        handle,
        message_id.map(str::to_string),
        visibility_timeout,
    ))
}

/// Service error codes that clear up on their own.
const TRANSIENT_CODES: &[&str] = &[
    "InternalError",
    "InternalFailure",
    "ServiceUnavailable",
    "RequestTimeout",
    "RequestThrottled",
    "ThrottlingException",
    "KmsThrottled",
];

fn is_transient_service_error(code: Option<&str>, status: u16) -> bool {
    if status == 429 || status >= 500 {
        return true;
    }
    code.is_some_and(|c| TRANSIENT_CODES.contains(&c) || c.contains("Throttl"))
}

/// Map an SDK failure onto the crate error, deciding whether a retry could help.
///
/// Network-level failures (dispatch, timeout, unparseable response) are
/// transient. Service errors are transient only when throttled or 5xx.
/// Everything else, including requests the SDK refused to build, is permanent.
fn sdk_error<E>(operation: QueueOperation, err: SdkError<E, HttpResponse>) -> ConsumeError
where
    E: std::error::Error + ProvideErrorMetadata + 'static,
{
    let transient = match &err {
        SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) | SdkError::ResponseError(_) => {
            true
        }
        SdkError::ServiceError(service) => {
            is_transient_service_error(service.err().code(), service.raw().status().as_u16())
        }
        _ => false,
    };

    let message = DisplayErrorContext(&err).to_string();
    debug!(%operation, transient, "sqs call failed");
    if transient {
        ConsumeError::transient(operation, message)
    } else {
        ConsumeError::permanent(operation, message)
    }
}

impl QueueClient for SqsQueue {
    fn receive(&mut self, options: ReceiveOptions) -> QueueFuture<'_, Option<MessageLease>> {
        Box::pin(async move {
            let request = ReceiveRequest::from_options(options)?;

            let out = self
                .client
                .receive_message()
                .queue_url(&self.queue_url)
                .max_number_of_messages(request.max_messages)
                .visibility_timeout(request.visibility_timeout)
                .wait_time_seconds(request.wait_time)
                .send()
                .await
                .map_err(|e| sdk_error(QueueOperation::Receive, e))?;

            let Some(message) = out.messages().first() else {
                return Ok(None);
            };

            let lease = lease_from_message(message, options.visibility_timeout)?;
            debug!(message_id = lease.display_id(), "received message");
            Ok(Some(lease))
        })
    }

    fn delete<'a>(&'a mut self, lease: &'a MessageLease) -> QueueFuture<'a, ()> {
        Box::pin(async move {
            self.client
                .delete_message()
                .queue_url(&self.queue_url)
                .receipt_handle(lease.receipt_handle().as_str())
                .send()
                .await
                .map_err(|e| sdk_error(QueueOperation::Delete, e))?;
            Ok(())
        })
    }

    fn change_visibility<'a>(
        &'a mut self,
        lease: &'a mut MessageLease,
        timeout: Duration,
    ) -> QueueFuture<'a, ()> {
        Box::pin(async move {
            let op = QueueOperation::ChangeVisibility;
            let secs = whole_seconds(op, "visibility timeout", timeout)?;

            self.client
                .change_message_visibility()
                .queue_url(&self.queue_url)
                .receipt_handle(lease.receipt_handle().as_str())
                .visibility_timeout(secs)
                .send()
                .await
                .map_err(|e| sdk_error(op, e))?;

            lease.reset_visibility(tokio::time::Instant::now(), timeout);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(wait_secs: u64, visibility_secs: u64) -> ReceiveOptions {
        ReceiveOptions {
            wait_time: Duration::from_secs(wait_secs),
            visibility_timeout: Duration::from_secs(visibility_secs),
        }
    }

    #[test]
    fn receive_request_asks_for_one_message_with_timeouts_unmodified() -> Result<()> {
        let request = ReceiveRequest::from_options(options(20, 43_200))?;

        assert_eq!(
            request,
            ReceiveRequest {
                max_messages: 1,
                visibility_timeout: 43_200,
                wait_time: 20,
            }
        );
        Ok(())
    }

    #[test]
    fn oversized_timeout_is_a_permanent_error() {
        let err = ReceiveRequest::from_options(options(1, u64::MAX)).unwrap_err();
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn message_without_body_has_empty_payload() -> Result<()> {
        let message = Message::builder()
            .receipt_handle("rh-1")
            .message_id("id-1")
            .build();

        let lease = lease_from_message(&message, Duration::from_secs(30))?;

        assert_eq!(lease.payload(), "");
        assert_eq!(lease.receipt_handle().as_str(), "rh-1");
        assert_eq!(lease.message_id(), Some("id-1"));
        Ok(())
    }

    #[tokio::test]
    async fn message_without_receipt_handle_is_rejected_without_retry() {
        let message = Message::builder().body("payload").build();

        let err = lease_from_message(&message, Duration::from_secs(30)).unwrap_err();
        assert!(!err.is_retryable());
    }

    #[test]
    fn throttling_and_server_errors_are_transient() {
        assert!(is_transient_service_error(Some("ThrottlingException"), 400));
        assert!(is_transient_service_error(Some("AWS.SimpleQueueService.RequestThrottled"), 403));
        assert!(is_transient_service_error(None, 503));
        assert!(is_transient_service_error(None, 429));
    }

    #[test]
    fn missing_queue_and_auth_errors_are_permanent() {
        assert!(!is_transient_service_error(
            Some("AWS.SimpleQueueService.NonExistentQueue"),
            400
        ));
        assert!(!is_transient_service_error(Some("QueueDoesNotExist"), 400));
        assert!(!is_transient_service_error(Some("AccessDenied"), 403));
        assert!(!is_transient_service_error(Some("InvalidAddress"), 404));
    }
}

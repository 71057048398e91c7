use std::fmt;

/// Queue call that produced an error, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueOperation {
    Receive,
    Delete,
    ChangeVisibility,
}

impl fmt::Display for QueueOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QueueOperation::Receive => "receive",
            QueueOperation::Delete => "delete",
            QueueOperation::ChangeVisibility => "change_visibility",
        };
        f.write_str(name)
    }
}

/// Per-delivery token required to delete or extend an in-flight message.
///
/// Distinct from the message id: a redelivered message carries a new handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReceiptHandle(String);

impl ReceiptHandle {
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReceiptHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ReceiptHandle {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ReceiptHandle {
    fn from(s: String) -> Self {
        Self(s)
    }
}

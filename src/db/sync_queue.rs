use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncOperation {
    Create,
    Update,
    Delete,
}

impl Display for SyncOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncOperation::Create => write!(f, "create"),
            SyncOperation::Update => write!(f, "update"),
            SyncOperation::Delete => write!(f, "delete"),
        }
    }
}

/// A queued sync operation. The queue is kept for parity with the
/// simulated backend protocol; nothing in the request path consumes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuedOperation {
    pub id: String,
    pub operation: SyncOperation,
    pub product_id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub queued_at: OffsetDateTime,
}

impl QueuedOperation {
    pub fn new(operation: SyncOperation, product_id: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            operation,
            product_id: product_id.to_string(),
            queued_at: OffsetDateTime::now_utc(),
        }
    }
}

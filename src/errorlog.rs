use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::AppError;

/// One recorded failure
#[derive(Debug, Clone, Serialize)]
pub struct ErrorEntry {
    pub timestamp: DateTime<Utc>,
    /// Human-readable error message
    pub error: String,
    /// Debug representation of the error, the closest analog to a stack trace
    pub detail: String,
    /// Where the failure happened, e.g. `{"query": ..., "action": ...}`
    pub context: serde_json::Value,
}

/// Append-only session error log
///
/// Every caught failure in the chat pipeline lands here with structured
/// context so a separate page can list and clear the entries. Entries live
/// for the lifetime of the process.
#[derive(Clone, Default)]
pub struct ErrorLog {
    entries: Arc<RwLock<Vec<ErrorEntry>>>,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry for a caught error
    pub async fn record(&self, error: &AppError, context: serde_json::Value) {
        let entry = ErrorEntry {
            timestamp: Utc::now(),
            error: error.to_string(),
            detail: format!("{:?}", error),
            context,
        };

        tracing::error!(error = %entry.error, context = %entry.context, "Recorded error");

        self.entries.write().await.push(entry);
    }

    /// Returns a snapshot of all entries, oldest first
    pub async fn snapshot(&self) -> Vec<ErrorEntry> {
        self.entries.read().await.clone()
    }

    /// Removes all entries
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_record_and_snapshot() {
        let log = ErrorLog::new();
        log.record(
            &AppError::ExternalApi("boom".to_string()),
            json!({ "query": "action", "action": "handle_message" }),
        )
        .await;

        let entries = log.snapshot().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].error, "External API error: boom");
        assert_eq!(entries[0].context["action"], "handle_message");
    }

    #[tokio::test]
    async fn test_clear() {
        let log = ErrorLog::new();
        log.record(&AppError::Internal("x".to_string()), json!({})).await;
        log.clear().await;
        assert!(log.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_entries_keep_order() {
        let log = ErrorLog::new();
        for i in 0..3 {
            log.record(&AppError::Internal(format!("e{}", i)), json!({})).await;
        }
        let entries = log.snapshot().await;
        assert_eq!(entries[0].error, "Internal server error: e0");
        assert_eq!(entries[2].error, "Internal server error: e2");
    }
}

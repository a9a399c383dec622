//! Mock implementations for testing.

use async_trait::async_trait;
use serde_json::json;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::domain::{AppError, TransactionGateway, TransactionRecord, UpstreamError};

/// `count` records with ids `tx-0..tx-{count-1}`, in that order
#[must_use]
pub fn sample_records(count: usize) -> Vec<TransactionRecord> {
    (0..count)
        .map(|i| {
            TransactionRecord::new(json!({
                "id": format!("tx-{}", i),
                "sender": format!("sender-{}", i),
                "receiver": format!("receiver-{}", i % 3),
                "amount": 100 + i,
                "currency": "ETB",
                "cause": format!("payment {}", i),
                "created_at": format!("{}", 1_700_000_000 + i),
            }))
        })
        .collect()
}

/// In-memory gateway that counts calls and can be told to fail
pub struct MockTransactionGateway {
    records: Vec<TransactionRecord>,
    failure: Option<UpstreamError>,
    list_calls: AtomicUsize,
    search_calls: AtomicUsize,
    last_query: Mutex<Option<String>>,
}

impl MockTransactionGateway {
    #[must_use]
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    #[must_use]
    pub fn with_records(records: Vec<TransactionRecord>) -> Self {
        Self {
            records,
            failure: None,
            list_calls: AtomicUsize::new(0),
            search_calls: AtomicUsize::new(0),
            last_query: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn failing(error: UpstreamError) -> Self {
        Self {
            failure: Some(error),
            ..Self::new()
        }
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    /// Total upstream calls of either kind
    pub fn total_calls(&self) -> usize {
        self.list_calls() + self.search_calls()
    }

    pub fn last_query(&self) -> Option<String> {
        self.last_query.lock().unwrap().clone()
    }

    fn check_should_fail(&self) -> Result<(), AppError> {
        match &self.failure {
            Some(error) => Err(AppError::Upstream(error.clone())),
            None => Ok(()),
        }
    }
}

impl Default for MockTransactionGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TransactionGateway for MockTransactionGateway {
    async fn list_all(&self) -> Result<Vec<TransactionRecord>, AppError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.check_should_fail()?;
        Ok(self.records.clone())
    }

    async fn search_all(&self, query: &str) -> Result<Vec<TransactionRecord>, AppError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock().unwrap() = Some(query.to_string());
        self.check_should_fail()?;

        // Mirrors the upstream: match on id, sender, receiver or cause.
        let needle = query.to_lowercase();
        Ok(self
            .records
            .iter()
            .filter(|record| {
                ["id", "sender", "receiver", "cause"].iter().any(|field| {
                    record
                        .as_value()
                        .get(*field)
                        .and_then(serde_json::Value::as_str)
                        .is_some_and(|v| v.to_lowercase().contains(&needle))
                })
            })
            .cloned()
            .collect())
    }
}

//! Domain traits defining contracts for external systems.

use async_trait::async_trait;

use super::error::AppError;
use super::types::TransactionRecord;

/// Read access to the wallet provider's transaction store.
///
/// Implementations return the full, unpaginated result set and never retry;
/// retry policy belongs to the caller.
#[async_trait]
pub trait TransactionGateway: Send + Sync {
    /// All transactions of the authenticated account
    async fn list_all(&self) -> Result<Vec<TransactionRecord>, AppError>;

    /// Transactions matching a free-text query
    async fn search_all(&self, query: &str) -> Result<Vec<TransactionRecord>, AppError>;
}

//! Application service: fetch the full upstream result, then paginate.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::domain::{AppError, PageRequest, SearchRequest, TransactionGateway, TransactionRecord};

use super::pagination::{Page, paginate};

/// Transaction listing and search over a [`TransactionGateway`].
///
/// Every call re-fetches and re-signs the full upstream list; nothing is cached
/// between requests.
pub struct TransactionService {
    gateway: Arc<dyn TransactionGateway>,
}

impl TransactionService {
    #[must_use]
    pub fn new(gateway: Arc<dyn TransactionGateway>) -> Self {
        Self { gateway }
    }

    #[instrument(skip(self), fields(page = request.page, limit = request.limit))]
    pub async fn list_transactions(
        &self,
        request: PageRequest,
    ) -> Result<Page<TransactionRecord>, AppError> {
        let records = self.gateway.list_all().await?;
        let page = paginate(records, request);
        info!(
            total = page.total,
            returned = page.items.len(),
            "Listed transactions"
        );
        Ok(page)
    }

    #[instrument(skip(self, request), fields(page = request.page, limit = request.limit))]
    pub async fn search_transactions(
        &self,
        request: &SearchRequest,
    ) -> Result<Page<TransactionRecord>, AppError> {
        let records = self.gateway.search_all(&request.query).await?;
        let page = paginate(records, request.page_request());
        info!(
            total = page.total,
            returned = page.items.len(),
            "Searched transactions"
        );
        Ok(page)
    }
}

use std::sync::Arc;
use tracing::{info, instrument};

use crate::{
    client::ResourceClient,
    errors::ServiceError,
    models::{
        stock_entry::STOCK_ENTRY_DOCTYPE, MaterialCheckResult, StockEntryPayload,
        SubmittedDocument, SubmittedStockEntry,
    },
};

/// Moves a work order's materials into its WIP warehouse.
#[derive(Clone)]
pub struct StockEntryBuilder {
    client: Arc<dyn ResourceClient>,
}

impl StockEntryBuilder {
    pub fn new(client: Arc<dyn ResourceClient>) -> Self {
        Self { client }
    }

    /// Transfer of every checked line at its required quantity.
    pub fn build(&self, results: &[MaterialCheckResult], wip_warehouse: &str) -> StockEntryPayload {
        StockEntryPayload::from_results(results, wip_warehouse)
    }

    #[instrument(skip(self, payload), fields(lines = payload.items.len(), to = %payload.to_warehouse))]
    pub async fn submit(
        &self,
        payload: &StockEntryPayload,
    ) -> Result<SubmittedStockEntry, ServiceError> {
        let body = serde_json::to_value(payload)?;
        let response = self
            .client
            .create_document(STOCK_ENTRY_DOCTYPE, &body)
            .await?;
        let submitted = SubmittedDocument::from_value(response.into_data_or_body())?;

        info!(
            "Submitted stock entry {} into {}",
            submitted.name.as_deref().unwrap_or("<unnamed>"),
            payload.to_warehouse
        );
        Ok(submitted)
    }
}

use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::{
    client::ResourceClient,
    errors::ServiceError,
    models::{work_order::WORK_ORDER_DOCTYPE, WorkOrder},
};

/// Reads work orders and their required materials from ERPNext
#[derive(Clone)]
pub struct WorkOrderFetcher {
    client: Arc<dyn ResourceClient>,
}

impl WorkOrderFetcher {
    pub fn new(client: Arc<dyn ResourceClient>) -> Self {
        Self { client }
    }

    /// Fetches a work order snapshot by name.
    ///
    /// Fails with `ValidationError` for a blank name and `NotFound` when
    /// ERPNext has no such record. Optional fields never fail the fetch.
    #[instrument(skip(self))]
    pub async fn fetch(&self, work_order_id: &str) -> Result<WorkOrder, ServiceError> {
        let name = work_order_id.trim();
        if name.is_empty() {
            return Err(ServiceError::ValidationError(
                "Work Order Name is required".to_string(),
            ));
        }

        let response = self
            .client
            .get_document(WORK_ORDER_DOCTYPE, name)
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    ServiceError::NotFound(format!("Work Order {}", name))
                } else {
                    warn!("Failed to fetch work order {}: {}", name, e);
                    e
                }
            })?;

        let mut work_order: WorkOrder = response
            .data_as()?
            .ok_or_else(|| ServiceError::NotFound(format!("Work Order {}", name)))?;

        if work_order.name.is_empty() {
            work_order.name = name.to_string();
        }

        info!(
            "Fetched work order {} with {} required items",
            work_order.name,
            work_order.required_items.len()
        );
        Ok(work_order)
    }
}

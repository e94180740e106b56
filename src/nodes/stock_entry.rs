use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::{run_batch, CreatedRecord, ItemErrorPolicy, ItemOutcome};
use crate::{
    errors::ServiceError,
    models::{AvailabilityStatus, WorkOrderCheck},
    services::stock_entries::StockEntryBuilder,
};

pub const SKIPPED_NOT_AVAILABLE: &str = "Skipped because status is not available";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockEntryCreated {
    pub stock_entry: CreatedRecord,
}

/// Transfers materials into the WIP warehouse of every fully stocked work order.
#[derive(Clone)]
pub struct CreateStockEntryNode {
    builder: StockEntryBuilder,
}

impl CreateStockEntryNode {
    pub fn new(builder: StockEntryBuilder) -> Self {
        Self { builder }
    }

    pub async fn run(
        &self,
        items: &[WorkOrderCheck],
        policy: ItemErrorPolicy,
    ) -> Result<Vec<ItemOutcome<StockEntryCreated>>, ServiceError> {
        run_batch(items, policy, |_, check| self.create(check)).await
    }

    #[instrument(skip(self, check), fields(work_order = ?check.work_order))]
    async fn create(
        &self,
        check: &WorkOrderCheck,
    ) -> Result<ItemOutcome<StockEntryCreated>, ServiceError> {
        if !check.status.map_or(false, AvailabilityStatus::is_available) {
            info!("{}", SKIPPED_NOT_AVAILABLE);
            return Ok(ItemOutcome::skipped(SKIPPED_NOT_AVAILABLE));
        }

        let wip_warehouse = check
            .wip_warehouse
            .as_deref()
            .map(str::trim)
            .filter(|wh| !wh.is_empty())
            .ok_or_else(|| {
                ServiceError::ValidationError("Work order has no WIP warehouse".to_string())
            })?;

        let mut payload = self
            .builder
            .build(&check.material_check_result, wip_warehouse);
        if let Some(work_order) = &check.work_order {
            payload = payload.for_work_order(work_order.clone());
        }

        let stock_entry = self.builder.submit(&payload).await?;
        Ok(ItemOutcome::Completed(StockEntryCreated {
            stock_entry: CreatedRecord::new(stock_entry),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{MockResourceClient, ResourceResponse};
    use crate::models::MaterialCheckResult;
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use std::sync::Arc;

    fn check(status: Option<AvailabilityStatus>, wip: Option<&str>) -> WorkOrderCheck {
        WorkOrderCheck {
            status,
            work_order: Some("WO-5".into()),
            wip_warehouse: wip.map(String::from),
            material_check_result: vec![
                MaterialCheckResult::evaluate("A", "Stores", dec!(2), dec!(9)),
                MaterialCheckResult::evaluate("B", "Stores", dec!(1), dec!(1)),
            ],
            ..Default::default()
        }
    }

    fn node(client: MockResourceClient) -> CreateStockEntryNode {
        CreateStockEntryNode::new(StockEntryBuilder::new(Arc::new(client)))
    }

    #[tokio::test]
    async fn unavailable_and_unknown_statuses_are_skipped() {
        let mut client = MockResourceClient::new();
        client.expect_create_document().never();

        let outcomes = node(client)
            .run(
                &[
                    check(Some(AvailabilityStatus::NotAvailable), Some("WIP")),
                    check(None, Some("WIP")),
                ],
                ItemErrorPolicy::Abort,
            )
            .await
            .unwrap();

        let value = serde_json::to_value(&outcomes).unwrap();
        assert_eq!(
            value,
            json!([
                {"success": false, "message": SKIPPED_NOT_AVAILABLE},
                {"success": false, "message": SKIPPED_NOT_AVAILABLE}
            ])
        );
    }

    #[tokio::test]
    async fn missing_wip_warehouse_is_a_validation_error() {
        let mut client = MockResourceClient::new();
        client.expect_create_document().never();

        let result = node(client)
            .run(&[check(Some(AvailabilityStatus::Available), None)], ItemErrorPolicy::Abort)
            .await;

        assert_matches!(
            result,
            Err(ServiceError::ItemFailed { item_index: 0, source })
                if matches!(*source, ServiceError::ValidationError(_))
        );
    }

    #[tokio::test]
    async fn available_work_order_is_transferred() {
        let mut client = MockResourceClient::new();
        client
            .expect_create_document()
            .times(1)
            .returning(|_, body| {
                assert_eq!(body["work_order"], json!("WO-5"));
                assert_eq!(body["to_warehouse"], json!("WIP"));
                assert_eq!(body["items"].as_array().map(Vec::len), Some(2));
                Ok(ResourceResponse::from_value(json!({"data": {"name": "MAT-STE-5"}})))
            });

        let outcomes = node(client)
            .run(&[check(Some(AvailabilityStatus::Available), Some("WIP"))], ItemErrorPolicy::Abort)
            .await
            .unwrap();

        let created = outcomes[0].completed().unwrap();
        assert!(created.stock_entry.success);
        assert_eq!(created.stock_entry.data.name.as_deref(), Some("MAT-STE-5"));
    }
}

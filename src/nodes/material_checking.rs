use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use validator::{Validate, ValidationError};

use super::{run_batch, ItemErrorPolicy, ItemOutcome};
use crate::{
    errors::ServiceError,
    models::WorkOrderCheck,
    services::{availability::AvailabilityChecker, work_orders::WorkOrderFetcher},
};

/// Input of one material check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct MaterialCheckingParams {
    #[validate(custom = "validate_not_blank")]
    pub work_order_name: String,
}

impl MaterialCheckingParams {
    pub fn new(work_order_name: impl Into<String>) -> Self {
        Self {
            work_order_name: work_order_name.into(),
        }
    }
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("work_order_name");
        err.message = Some("Work Order Name is required".into());
        return Err(err);
    }
    Ok(())
}

/// Fetches each work order and checks its required materials against stock.
#[derive(Clone)]
pub struct MaterialCheckingNode {
    fetcher: WorkOrderFetcher,
    checker: AvailabilityChecker,
}

impl MaterialCheckingNode {
    pub fn new(fetcher: WorkOrderFetcher, checker: AvailabilityChecker) -> Self {
        Self { fetcher, checker }
    }

    pub async fn run(
        &self,
        items: &[MaterialCheckingParams],
        policy: ItemErrorPolicy,
    ) -> Result<Vec<ItemOutcome<WorkOrderCheck>>, ServiceError> {
        run_batch(items, policy, |_, params| self.check(params)).await
    }

    #[instrument(skip(self, params), fields(work_order = %params.work_order_name))]
    async fn check(
        &self,
        params: &MaterialCheckingParams,
    ) -> Result<ItemOutcome<WorkOrderCheck>, ServiceError> {
        params.validate()?;

        let work_order = self.fetcher.fetch(&params.work_order_name).await?;
        let report = self.checker.check(&work_order.required_items).await?;
        info!(
            "Work order {} materials: {}",
            work_order.name, report.overall_status
        );

        Ok(ItemOutcome::Completed(WorkOrderCheck {
            status: Some(report.overall_status),
            work_order: Some(work_order.name),
            item_name: work_order.item_name,
            sales_order: work_order.sales_order,
            triggered_by: work_order.owner,
            triggered_on: work_order.creation,
            wip_warehouse: work_order.wip_warehouse,
            material_check_result: report.results,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{MockResourceClient, ResourceResponse};
    use crate::models::{AvailabilityStatus, StockLevel};
    use crate::services::stock::MockStockLookup;
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use std::sync::Arc;

    fn node(client: MockResourceClient, stock: MockStockLookup) -> MaterialCheckingNode {
        MaterialCheckingNode::new(
            WorkOrderFetcher::new(Arc::new(client)),
            AvailabilityChecker::new(Arc::new(stock)),
        )
    }

    fn work_order_client() -> MockResourceClient {
        let mut client = MockResourceClient::new();
        client.expect_get_document().returning(|_, name| {
            Ok(ResourceResponse::from_value(json!({
                "data": {
                    "name": name,
                    "item_name": "Desk",
                    "sales_order": "SO-1",
                    "owner": "planner@example.com",
                    "creation": "2024-03-01 09:30:00.000000",
                    "wip_warehouse": "WIP",
                    "required_items": [
                        {"item_code": "X", "source_warehouse": "W1", "required_qty": 10}
                    ]
                }
            })))
        });
        client
    }

    #[tokio::test]
    async fn produces_a_check_record_per_work_order() {
        let mut stock = MockStockLookup::new();
        stock
            .expect_stock_level()
            .returning(|item, wh| Ok(Some(StockLevel::new(item, wh, dec!(4)))));

        let outcomes = node(work_order_client(), stock)
            .run(&[MaterialCheckingParams::new("WO-1")], ItemErrorPolicy::Abort)
            .await
            .unwrap();

        let check = outcomes[0].completed().unwrap();
        assert_eq!(check.status, Some(AvailabilityStatus::NotAvailable));
        assert_eq!(check.work_order.as_deref(), Some("WO-1"));
        assert_eq!(check.triggered_by.as_deref(), Some("planner@example.com"));
        assert_eq!(check.triggered_on.as_deref(), Some("2024-03-01 09:30:00.000000"));
        assert_eq!(check.wip_warehouse.as_deref(), Some("WIP"));
        assert_eq!(check.material_check_result[0].request_qty, dec!(6));
    }

    #[tokio::test]
    async fn blank_name_fails_validation() {
        let mut client = MockResourceClient::new();
        client.expect_get_document().never();

        let result = node(client, MockStockLookup::new())
            .run(&[MaterialCheckingParams::new("  ")], ItemErrorPolicy::Abort)
            .await;

        assert_matches!(
            result,
            Err(ServiceError::ItemFailed { item_index: 0, source })
                if matches!(*source, ServiceError::ValidationError(_))
        );
    }

    #[tokio::test]
    async fn continue_policy_keeps_later_items() {
        let mut stock = MockStockLookup::new();
        stock.expect_stock_level().returning(|_, _| Ok(None));

        let outcomes = node(work_order_client(), stock)
            .run(
                &[MaterialCheckingParams::new(""), MaterialCheckingParams::new("WO-2")],
                ItemErrorPolicy::Continue,
            )
            .await
            .unwrap();

        assert_matches!(outcomes[0], ItemOutcome::Failed { .. });
        assert!(outcomes[1].is_completed());
    }
}

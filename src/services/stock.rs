use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

use crate::{
    client::{ListQuery, ResourceClient},
    errors::ServiceError,
    models::{
        stock::{BIN_DOCTYPE, BIN_FIELDS},
        StockLevel,
    },
};

/// Current on-hand quantity of an item in a warehouse.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StockLookup: Send + Sync {
    /// `Ok(None)` when no stock record exists for the pair.
    async fn stock_level(
        &self,
        item_code: &str,
        warehouse: &str,
    ) -> Result<Option<StockLevel>, ServiceError>;
}

/// Looks stock up in ERPNext's Bin doctype, one request per pair.
#[derive(Clone)]
pub struct BinStockLookup {
    client: Arc<dyn ResourceClient>,
}

impl BinStockLookup {
    pub fn new(client: Arc<dyn ResourceClient>) -> Self {
        Self { client }
    }

    fn query(item_code: &str, warehouse: &str) -> ListQuery {
        ListQuery::new(
            json!({
                "item_code": item_code,
                "warehouse": warehouse,
            }),
            &BIN_FIELDS,
        )
    }
}

#[async_trait]
impl StockLookup for BinStockLookup {
    async fn stock_level(
        &self,
        item_code: &str,
        warehouse: &str,
    ) -> Result<Option<StockLevel>, ServiceError> {
        let response = self
            .client
            .list_documents(BIN_DOCTYPE, &Self::query(item_code, warehouse))
            .await?;

        let bins: Vec<StockLevel> = response.data_as()?.unwrap_or_default();
        let level = bins.into_iter().next();
        if level.is_none() {
            debug!("No Bin for item {} in warehouse {}", item_code, warehouse);
        }
        Ok(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{MockResourceClient, ResourceResponse};
    use mockall::predicate::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn returns_first_bin_record() {
        let mut mock = MockResourceClient::new();
        mock.expect_list_documents()
            .with(eq("Bin"), eq(BinStockLookup::query("X", "W1")))
            .times(1)
            .returning(|_, _| {
                Ok(ResourceResponse::from_value(json!({
                    "data": [{"item_code": "X", "warehouse": "W1", "actual_qty": 4.0}]
                })))
            });

        let lookup = BinStockLookup::new(Arc::new(mock));
        let level = lookup.stock_level("X", "W1").await.unwrap().unwrap();
        assert_eq!(level.actual_qty, dec!(4));
    }

    #[tokio::test]
    async fn empty_list_means_no_record() {
        let mut mock = MockResourceClient::new();
        mock.expect_list_documents()
            .returning(|_, _| Ok(ResourceResponse::from_value(json!({"data": []}))));

        let lookup = BinStockLookup::new(Arc::new(mock));
        assert_eq!(lookup.stock_level("Z", "W1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn missing_data_means_no_record() {
        let mut mock = MockResourceClient::new();
        mock.expect_list_documents()
            .returning(|_, _| Ok(ResourceResponse::from_value(json!({}))));

        let lookup = BinStockLookup::new(Arc::new(mock));
        assert_eq!(lookup.stock_level("Z", "W1").await.unwrap(), None);
    }

    #[test]
    fn query_requests_bin_fields() {
        let query = BinStockLookup::query("X", "W1");
        assert_eq!(query.filters, json!({"item_code": "X", "warehouse": "W1"}));
        assert_eq!(query.fields, vec!["item_code", "warehouse", "actual_qty"]);
    }
}

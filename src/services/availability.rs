use futures::{stream, StreamExt, TryStreamExt};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::{
    errors::ServiceError,
    models::{MaterialCheckReport, MaterialCheckResult, RequiredItem, StockLevel},
    services::stock::StockLookup,
};

/// Compares required materials against on-hand stock.
#[derive(Clone)]
pub struct AvailabilityChecker {
    stock: Arc<dyn StockLookup>,
    concurrency: usize,
}

impl AvailabilityChecker {
    /// Checker issuing one stock lookup at a time.
    pub fn new(stock: Arc<dyn StockLookup>) -> Self {
        Self {
            stock,
            concurrency: 1,
        }
    }

    /// Allow up to `concurrency` lookups in flight. Results keep input order.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Checks every required item, one result per item in input order.
    ///
    /// A missing stock record counts as zero on hand. The first failed lookup
    /// fails the whole check.
    #[instrument(skip(self, required_items), fields(items = required_items.len()))]
    pub async fn check(
        &self,
        required_items: &[RequiredItem],
    ) -> Result<MaterialCheckReport, ServiceError> {
        let results: Vec<MaterialCheckResult> = stream::iter(required_items)
            .map(|item| self.check_item(item))
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        let report = MaterialCheckReport::new(results);
        info!(
            "Material check finished: {} ({} of {} items short)",
            report.overall_status,
            report.shortages().count(),
            report.results.len()
        );
        Ok(report)
    }

    async fn check_item(&self, item: &RequiredItem) -> Result<MaterialCheckResult, ServiceError> {
        let level = self
            .stock
            .stock_level(&item.item_code, &item.source_warehouse)
            .await?;
        Ok(Self::classify(item, level.as_ref()))
    }

    /// Classifies one item against its stock record (absent means zero).
    pub fn classify(item: &RequiredItem, level: Option<&StockLevel>) -> MaterialCheckResult {
        let available_qty = level.map_or(Decimal::ZERO, |l| l.actual_qty);
        let result = MaterialCheckResult::evaluate(
            item.item_code.clone(),
            item.source_warehouse.clone(),
            item.required_qty,
            available_qty,
        );
        debug!(
            "Item {} in {}: required {}, available {}, {}",
            result.item_code, result.warehouse, result.required_qty, result.available_qty, result.status
        );
        result
    }
}

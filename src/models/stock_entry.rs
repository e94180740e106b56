use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::document::DocStatus;
use super::material_check::MaterialCheckResult;

/// ERPNext doctype name of a stock entry.
pub const STOCK_ENTRY_DOCTYPE: &str = "Stock Entry";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockEntryType {
    #[serde(rename = "Material Transfer for Manufacture")]
    MaterialTransferForManufacture,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockEntryItem {
    /// Source warehouse
    pub s_warehouse: String,
    pub item_code: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub qty: Decimal,
    /// Target (work-in-progress) warehouse
    pub t_warehouse: String,
}

/// Body of `POST /api/resource/Stock Entry`, created already submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockEntryPayload {
    pub stock_entry_type: StockEntryType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_order: Option<String>,
    pub to_warehouse: String,
    pub items: Vec<StockEntryItem>,
    pub docstatus: DocStatus,
}

impl StockEntryPayload {
    /// Transfer of every checked line, available or not, moving its full
    /// `required_qty` from the source warehouse into `wip_warehouse`.
    pub fn from_results(results: &[MaterialCheckResult], wip_warehouse: &str) -> Self {
        let items = results
            .iter()
            .map(|result| StockEntryItem {
                s_warehouse: result.warehouse.clone(),
                item_code: result.item_code.clone(),
                qty: result.required_qty,
                t_warehouse: wip_warehouse.to_string(),
            })
            .collect();

        Self {
            stock_entry_type: StockEntryType::MaterialTransferForManufacture,
            work_order: None,
            to_warehouse: wip_warehouse.to_string(),
            items,
            docstatus: DocStatus::Submitted,
        }
    }

    /// Links the entry to the work order it stages material for.
    pub fn for_work_order(mut self, work_order: impl Into<String>) -> Self {
        self.work_order = Some(work_order.into());
        self
    }
}

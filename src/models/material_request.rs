use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::document::DocStatus;
use super::material_check::MaterialCheckResult;

/// ERPNext doctype name of a material request.
pub const MATERIAL_REQUEST_DOCTYPE: &str = "Material Request";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaterialRequestType {
    Purchase,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRequestItem {
    pub item_code: String,
    pub warehouse: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub qty: Decimal,
}

/// Body of `POST /api/resource/Material Request`, created as a draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRequestPayload {
    pub material_request_type: MaterialRequestType,
    pub schedule_date: NaiveDate,
    pub items: Vec<MaterialRequestItem>,
    pub docstatus: DocStatus,
}

impl MaterialRequestPayload {
    /// Purchase request for every line with a non-zero `request_qty`, in input
    /// order. An all-available input yields an empty line list.
    pub fn from_results(results: &[MaterialCheckResult], schedule_date: NaiveDate) -> Self {
        let items = results
            .iter()
            .filter(|result| !result.request_qty.is_zero())
            .map(|result| MaterialRequestItem {
                item_code: result.item_code.clone(),
                warehouse: result.warehouse.clone(),
                qty: result.request_qty,
            })
            .collect();

        Self {
            material_request_type: MaterialRequestType::Purchase,
            schedule_date,
            items,
            docstatus: DocStatus::Draft,
        }
    }

    pub fn total_qty(&self) -> Decimal {
        self.items.iter().map(|item| item.qty).sum()
    }
}

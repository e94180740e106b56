use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::de;

/// ERPNext doctype name of a work order.
pub const WORK_ORDER_DOCTYPE: &str = "Work Order";

const ERPNEXT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// A material line of a work order (`required_items` child table).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequiredItem {
    #[serde(default, deserialize_with = "de::string_or_default")]
    pub item_code: String,
    #[serde(default, deserialize_with = "de::string_or_default")]
    pub source_warehouse: String,
    #[serde(
        default,
        deserialize_with = "de::decimal_or_zero",
        serialize_with = "rust_decimal::serde::float::serialize"
    )]
    pub required_qty: Decimal,
}

impl RequiredItem {
    pub fn new(
        item_code: impl Into<String>,
        source_warehouse: impl Into<String>,
        required_qty: Decimal,
    ) -> Self {
        Self {
            item_code: item_code.into(),
            source_warehouse: source_warehouse.into(),
            required_qty,
        }
    }
}

/// Work order snapshot as returned by `GET /api/resource/Work Order/{name}`.
///
/// Only `name` is guaranteed; every other field is optional on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkOrder {
    #[serde(default, deserialize_with = "de::string_or_default")]
    pub name: String,
    #[serde(default)]
    pub item_name: Option<String>,
    #[serde(default, deserialize_with = "de::vec_or_empty")]
    pub required_items: Vec<RequiredItem>,
    #[serde(default)]
    pub wip_warehouse: Option<String>,
    #[serde(default)]
    pub sales_order: Option<String>,
    /// User that created the work order
    #[serde(default)]
    pub owner: Option<String>,
    /// Creation timestamp, kept in ERPNext's textual form
    #[serde(default)]
    pub creation: Option<String>,
}

impl WorkOrder {
    /// Parses `creation`; `None` when absent or not in ERPNext's datetime format.
    pub fn created_at(&self) -> Option<NaiveDateTime> {
        self.creation
            .as_deref()
            .and_then(|raw| NaiveDateTime::parse_from_str(raw.trim(), ERPNEXT_DATETIME_FORMAT).ok())
    }
}

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::de;

/// ERPNext doctype holding per-(item, warehouse) quantities.
pub const BIN_DOCTYPE: &str = "Bin";

/// Fields requested from a Bin lookup.
pub const BIN_FIELDS: [&str; 3] = ["item_code", "warehouse", "actual_qty"];

/// On-hand quantity of one item in one warehouse (a Bin record).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockLevel {
    #[serde(default, deserialize_with = "de::string_or_default")]
    pub item_code: String,
    #[serde(default, deserialize_with = "de::string_or_default")]
    pub warehouse: String,
    #[serde(
        default,
        deserialize_with = "de::decimal_or_zero",
        serialize_with = "rust_decimal::serde::float::serialize"
    )]
    pub actual_qty: Decimal,
}

impl StockLevel {
    pub fn new(item_code: impl Into<String>, warehouse: impl Into<String>, actual_qty: Decimal) -> Self {
        Self {
            item_code: item_code.into(),
            warehouse: warehouse.into(),
            actual_qty,
        }
    }
}

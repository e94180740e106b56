use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

use super::de;

/// Availability of a single material line, or of a whole work order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr)]
pub enum AvailabilityStatus {
    #[serde(rename = "available")]
    #[strum(serialize = "available")]
    Available,
    #[serde(rename = "not available", alias = "not-available")]
    #[strum(serialize = "not available")]
    NotAvailable,
}

/// Aggregate status of a check; shares the per-line representation.
pub type OverallStatus = AvailabilityStatus;

impl AvailabilityStatus {
    /// `NotAvailable` as soon as one line is short; `Available` otherwise,
    /// including for an empty collection.
    pub fn from_results(results: &[MaterialCheckResult]) -> Self {
        if results.iter().any(MaterialCheckResult::is_short) {
            AvailabilityStatus::NotAvailable
        } else {
            AvailabilityStatus::Available
        }
    }

    pub fn is_available(self) -> bool {
        self == AvailabilityStatus::Available
    }
}

/// Outcome of comparing one required item against its stock level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialCheckResult {
    #[serde(default, deserialize_with = "de::string_or_default")]
    pub item_code: String,
    /// Source warehouse the item is taken from
    #[serde(default, deserialize_with = "de::string_or_default")]
    pub warehouse: String,
    pub status: AvailabilityStatus,
    #[serde(
        default,
        deserialize_with = "de::decimal_or_zero",
        serialize_with = "rust_decimal::serde::float::serialize"
    )]
    pub required_qty: Decimal,
    #[serde(
        default,
        deserialize_with = "de::decimal_or_zero",
        serialize_with = "rust_decimal::serde::float::serialize"
    )]
    pub available_qty: Decimal,
    /// Quantity to procure; zero unless the line is short
    #[serde(
        default,
        deserialize_with = "de::decimal_or_zero",
        serialize_with = "rust_decimal::serde::float::serialize"
    )]
    pub request_qty: Decimal,
}

impl MaterialCheckResult {
    /// Classifies a line: available when `available_qty >= required_qty`,
    /// otherwise short by exactly `required_qty - available_qty`.
    pub fn evaluate(
        item_code: impl Into<String>,
        warehouse: impl Into<String>,
        required_qty: Decimal,
        available_qty: Decimal,
    ) -> Self {
        let (status, request_qty) = if available_qty >= required_qty {
            (AvailabilityStatus::Available, Decimal::ZERO)
        } else {
            (AvailabilityStatus::NotAvailable, required_qty - available_qty)
        };

        Self {
            item_code: item_code.into(),
            warehouse: warehouse.into(),
            status,
            required_qty,
            available_qty,
            request_qty,
        }
    }

    pub fn is_short(&self) -> bool {
        self.status == AvailabilityStatus::NotAvailable
    }
}

/// Result of checking a list of required items: the ordered per-line results
/// and their aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialCheckReport {
    pub overall_status: OverallStatus,
    pub results: Vec<MaterialCheckResult>,
}

impl MaterialCheckReport {
    pub fn new(results: Vec<MaterialCheckResult>) -> Self {
        Self {
            overall_status: OverallStatus::from_results(&results),
            results,
        }
    }

    pub fn shortages(&self) -> impl Iterator<Item = &MaterialCheckResult> {
        self.results.iter().filter(|r| r.is_short())
    }
}

/// Record produced for each checked work order. Both downstream steps read it
/// back as their input, so every field tolerates absence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkOrderCheck {
    #[serde(default)]
    pub status: Option<OverallStatus>,
    #[serde(default)]
    pub work_order: Option<String>,
    #[serde(default)]
    pub item_name: Option<String>,
    #[serde(default)]
    pub sales_order: Option<String>,
    /// Work order owner
    #[serde(default)]
    pub triggered_by: Option<String>,
    /// Work order creation timestamp
    #[serde(default)]
    pub triggered_on: Option<String>,
    #[serde(default)]
    pub wip_warehouse: Option<String>,
    #[serde(default, deserialize_with = "de::vec_or_empty")]
    pub material_check_result: Vec<MaterialCheckResult>,
}

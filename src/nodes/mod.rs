//! Batch drivers for the three material-flow steps.
//!
//! Each node processes its input items strictly in order and applies an
//! [`ItemErrorPolicy`] chosen by the caller: abort the batch on the first
//! failure, or record the failure in place and keep going.

use serde::{ser::SerializeMap, Deserialize, Serialize, Serializer};
use std::future::Future;
use strum::{AsRefStr, Display, EnumString};
use tracing::{error, warn};

use crate::{errors::ServiceError, models::SubmittedDocument};

pub mod material_checking;
pub mod material_request;
pub mod stock_entry;

pub use material_checking::{MaterialCheckingNode, MaterialCheckingParams};
pub use material_request::{CreateMaterialRequestNode, MaterialRequestCreated};
pub use stock_entry::{CreateStockEntryNode, StockEntryCreated};

/// What a batch does when one of its items fails.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ItemErrorPolicy {
    /// Stop at the failing item; the error names its position.
    #[default]
    Abort,
    /// Emit a failure record for the item and process the rest.
    Continue,
}

/// Record created by one of the creation steps, with its success flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedRecord {
    pub success: bool,
    pub data: SubmittedDocument,
}

impl CreatedRecord {
    pub fn new(data: SubmittedDocument) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Per-item result of a batch, in input order.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome<T> {
    Completed(T),
    Skipped { message: String },
    Failed { error: String },
}

impl<T> ItemOutcome<T> {
    pub fn skipped(message: impl Into<String>) -> Self {
        ItemOutcome::Skipped {
            message: message.into(),
        }
    }

    pub fn completed(&self) -> Option<&T> {
        match self {
            ItemOutcome::Completed(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, ItemOutcome::Completed(_))
    }
}

impl<T: Serialize> Serialize for ItemOutcome<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ItemOutcome::Completed(value) => value.serialize(serializer),
            ItemOutcome::Skipped { message } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("success", &false)?;
                map.serialize_entry("message", message)?;
                map.end()
            }
            ItemOutcome::Failed { error } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("success", &false)?;
                map.serialize_entry("error", error)?;
                map.end()
            }
        }
    }
}

/// Runs `step` over `inputs` one at a time, applying `policy` to failures.
///
/// With [`ItemErrorPolicy::Abort`] the first error is returned wrapped with the
/// item's index; with [`ItemErrorPolicy::Continue`] it becomes
/// [`ItemOutcome::Failed`] at that position.
pub async fn run_batch<'a, I, T, F, Fut>(
    inputs: &'a [I],
    policy: ItemErrorPolicy,
    mut step: F,
) -> Result<Vec<ItemOutcome<T>>, ServiceError>
where
    F: FnMut(usize, &'a I) -> Fut,
    Fut: Future<Output = Result<ItemOutcome<T>, ServiceError>>,
{
    let mut outcomes = Vec::with_capacity(inputs.len());
    for (index, input) in inputs.iter().enumerate() {
        match step(index, input).await {
            Ok(outcome) => outcomes.push(outcome),
            Err(err) => match policy {
                ItemErrorPolicy::Abort => {
                    error!("Item {} failed, aborting batch: {}", index, err);
                    return Err(err.at_item(index));
                }
                ItemErrorPolicy::Continue => {
                    warn!("Item {} failed, continuing: {}", index, err);
                    outcomes.push(ItemOutcome::Failed {
                        error: err.to_string(),
                    });
                }
            },
        }
    }
    Ok(outcomes)
}

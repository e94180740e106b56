use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Frappe document lifecycle state (`docstatus`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum DocStatus {
    Draft,
    Submitted,
    Cancelled,
}

impl From<DocStatus> for u8 {
    fn from(status: DocStatus) -> Self {
        match status {
            DocStatus::Draft => 0,
            DocStatus::Submitted => 1,
            DocStatus::Cancelled => 2,
        }
    }
}

impl TryFrom<u8> for DocStatus {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(DocStatus::Draft),
            1 => Ok(DocStatus::Submitted),
            2 => Ok(DocStatus::Cancelled),
            other => Err(format!("invalid docstatus {}", other)),
        }
    }
}

/// Record echoed back by ERPNext after a document was created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmittedDocument {
    /// Document name assigned by the naming series (e.g. "MAT-MR-2024-00001")
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub doctype: Option<String>,
    #[serde(default)]
    pub docstatus: Option<i64>,
    /// Remaining document fields
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl SubmittedDocument {
    /// Reads the created record; `null` becomes an empty document.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        match value {
            Value::Null => Ok(Self {
                name: None,
                doctype: None,
                docstatus: None,
                extra: HashMap::new(),
            }),
            other => serde_json::from_value(other),
        }
    }
}

pub type SubmittedMaterialRequest = SubmittedDocument;
pub type SubmittedStockEntry = SubmittedDocument;

//! ERPNext documents exchanged by the material flow.
//!
//! Every type here is a request-scoped snapshot: it is built from (or for) a
//! single HTTP exchange and never cached.

// Documents read from ERPNext
pub mod stock;
pub mod work_order;

// Reconciliation output
pub mod material_check;

// Documents written to ERPNext
pub mod document;
pub mod material_request;
pub mod stock_entry;

mod de;

pub use document::{DocStatus, SubmittedDocument, SubmittedMaterialRequest, SubmittedStockEntry};
pub use material_check::{
    AvailabilityStatus, MaterialCheckReport, MaterialCheckResult, OverallStatus, WorkOrderCheck,
};
pub use material_request::{MaterialRequestItem, MaterialRequestPayload, MaterialRequestType};
pub use stock::StockLevel;
pub use stock_entry::{StockEntryItem, StockEntryPayload, StockEntryType};
pub use work_order::{RequiredItem, WorkOrder};

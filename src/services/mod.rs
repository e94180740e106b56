// Reading from ERPNext
pub mod stock;
pub mod work_orders;

// Reconciliation
pub mod availability;

// Writing to ERPNext
pub mod material_requests;
pub mod stock_entries;

// Service factory for dependency injection
pub mod factory;

pub use availability::AvailabilityChecker;
pub use factory::{AppServices, ServiceFactory};
pub use material_requests::MaterialRequestBuilder;
pub use stock::{BinStockLookup, StockLookup};
pub use stock_entries::StockEntryBuilder;
pub use work_orders::WorkOrderFetcher;

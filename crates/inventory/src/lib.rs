//! Inventory domain module.
//!
//! This crate contains the catalog and billing rules, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage). The stateful
//! store that persists these records lives in `inventrobil-infra`.

pub mod billing;
pub mod event;
pub mod export;
pub mod numeric;
pub mod product;
pub mod search;
pub mod seed;
pub mod stats;

pub use billing::{BillingRecord, DEFAULT_UNIT, Sale, SaleLine, UNKNOWN_PRODUCT, iso_timestamp};
pub use event::InventoryEvent;
pub use export::{INVALID_FORMAT, InventoryExport, export_file_name, parse_import};
pub use numeric::{NumericInput, NumericPolicy};
pub use product::{
    Category, LOW_STOCK_THRESHOLD, MEDIUM_STOCK_THRESHOLD, Product, ProductDraft, ProductPatch,
    StockLevel,
};
pub use search::ProductFilter;
pub use seed::sample_products;
pub use stats::DashboardStats;

//! Export/import document (`{ exportDate, totalProducts, products }`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use inventrobil_core::{DomainError, DomainResult};

use crate::billing::iso_timestamp;
use crate::product::Product;

/// Message carried by the format error when `products` is missing or not an array.
pub const INVALID_FORMAT: &str = "Invalid inventory data format";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryExport {
    /// Instant behind `export_date`; the download name is derived from it.
    #[serde(skip)]
    pub exported_at: DateTime<Utc>,
    pub export_date: String,
    pub total_products: usize,
    pub products: Vec<Product>,
}

impl InventoryExport {
    pub fn new(products: Vec<Product>, at: DateTime<Utc>) -> Self {
        Self {
            exported_at: at,
            export_date: iso_timestamp(at),
            total_products: products.len(),
            products,
        }
    }

    /// Download name matching the date in `exportDate`.
    pub fn file_name(&self) -> String {
        export_file_name(self.exported_at)
    }
}

/// Download name for an export taken at `at`: `inventory_<YYYY-MM-DD>.json`.
pub fn export_file_name(at: DateTime<Utc>) -> String {
    format!("inventory_{}.json", at.format("%Y-%m-%d"))
}

/// Extract the product list from an import document.
///
/// Only `products` is looked at; `exportDate`, `totalProducts` and any other
/// top-level keys are ignored. Each entry must have the product shape;
/// unknown per-product fields pass through.
pub fn parse_import(data: &Value) -> DomainResult<Vec<Product>> {
    let Some(items) = data.get("products").and_then(Value::as_array) else {
        return Err(DomainError::format(INVALID_FORMAT));
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value::<Product>(item.clone()).map_err(|e| {
                DomainError::format(format!("{INVALID_FORMAT}: product {index}: {e}"))
            })
        })
        .collect()
}

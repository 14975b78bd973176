use serde::{Deserialize, Serialize};

use crate::billing::BillingRecord;
use crate::product::{LOW_STOCK_THRESHOLD, Product};

/// Home-page summary of the catalog and billing history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_products: usize,
    pub low_stock_count: usize,
    pub total_transactions: usize,
    pub total_revenue: f64,
}

impl DashboardStats {
    /// Records without a numeric `total` contribute nothing to revenue.
    pub fn compute(products: &[Product], history: &[BillingRecord]) -> Self {
        Self {
            total_products: products.len(),
            low_stock_count: products
                .iter()
                .filter(|p| p.stock < LOW_STOCK_THRESHOLD)
                .count(),
            total_transactions: history.len(),
            total_revenue: history.iter().filter_map(BillingRecord::total).sum(),
        }
    }
}

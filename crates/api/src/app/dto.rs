use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use inventrobil_core::ProductId;
use inventrobil_inventory::{Category, Product, ProductFilter, StockLevel};

use crate::app::errors;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct UpdateStockRequest {
    pub stock: i64,
}

/// `?q=&category=` on the product listing.
#[derive(Debug, Default, Deserialize)]
pub struct ListProductsQuery {
    pub q: Option<String>,
    pub category: Option<String>,
}

impl ListProductsQuery {
    pub fn into_filter(self) -> Result<ProductFilter, axum::response::Response> {
        let mut filter = ProductFilter::default();
        if let Some(q) = self.q {
            filter = filter.with_query(q);
        }
        if let Some(raw) = self.category.filter(|c| !c.trim().is_empty()) {
            let category: Category = raw.parse().map_err(|_| {
                errors::json_error(
                    StatusCode::BAD_REQUEST,
                    "invalid_category",
                    "category must be one of: Plumbing, Electronics",
                )
            })?;
            filter = filter.with_category(category);
        }
        Ok(filter)
    }
}

// -------------------------
// Response DTOs
// -------------------------

/// A product as shown to clients: the stored record plus its stock badge.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    pub stock_level: StockLevel,
}

impl From<Product> for ProductView {
    fn from(mut product: Product) -> Self {
        // A view posted back as a product must not carry the badge into storage.
        product.extra.remove("stockLevel");
        let stock_level = product.stock_level();
        Self {
            product,
            stock_level,
        }
    }
}

// -------------------------
// Helpers
// -------------------------

pub fn parse_product_id(raw: &str) -> Result<ProductId, axum::response::Response> {
    raw.parse()
        .map_err(|_| errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id"))
}

/// Unwrap a JSON body, turning extractor rejections into the usual error body.
pub fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, axum::response::Response> {
    body.map(|Json(value)| value)
        .map_err(errors::json_rejection_to_response)
}

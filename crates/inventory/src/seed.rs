//! Built-in sample catalog, used when no stored inventory exists.

use serde_json::Map;

use inventrobil_core::ProductId;

use crate::product::{Category, Product};

pub fn sample_products() -> Vec<Product> {
    [
        (1, "PVC Pipe 1/2 inch", Category::Plumbing, 50, 10.99, "PVC001"),
        (2, "Copper Wire 2.5mm", Category::Electronics, 5, 15.50, "COP001"),
        (3, "Switch Socket", Category::Electronics, 20, 5.50, "SWT001"),
        (4, "PVC Pipe 1 inch", Category::Plumbing, 35, 18.99, "PVC002"),
        (5, "Electrical Box", Category::Electronics, 8, 8.75, "ELB001"),
    ]
    .into_iter()
    .map(|(id, name, category, stock, price, sku)| Product {
        id: ProductId::new(id),
        name: name.to_string(),
        category,
        stock,
        price,
        sku: sku.to_string(),
        extra: Map::new(),
    })
    .collect()
}

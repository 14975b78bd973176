//! Catalog search.

use serde::{Deserialize, Serialize};

use crate::product::{Category, Product};

/// Case-insensitive substring match on name or SKU, optionally narrowed to a category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFilter {
    #[serde(default, rename = "q")]
    pub query: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
}

impl ProductFilter {
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn matches(&self, product: &Product) -> bool {
        if self.category.is_some_and(|c| c != product.category) {
            return false;
        }

        match self.query.as_deref() {
            None | Some("") => true,
            Some(query) => {
                let needle = query.to_lowercase();
                product.name.to_lowercase().contains(&needle)
                    || product.sku.to_lowercase().contains(&needle)
            }
        }
    }

    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        products.iter().filter(|p| self.matches(p)).collect()
    }
}

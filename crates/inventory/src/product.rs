use core::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use inventrobil_core::{DomainError, DomainResult, Entity, ProductId};

use crate::numeric::{NumericInput, NumericPolicy};

/// Stock strictly below this is "low".
pub const LOW_STOCK_THRESHOLD: i64 = 10;

/// Stock strictly below this (and not low) is "medium".
pub const MEDIUM_STOCK_THRESHOLD: i64 = 20;

/// Key that only the store may assign; never taken from pass-through fields.
const ID_FIELD: &str = "id";

/// Product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    #[default]
    Plumbing,
    Electronics,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Plumbing => "Plumbing",
            Category::Electronics => "Electronics",
        }
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plumbing" => Ok(Category::Plumbing),
            "electronics" => Ok(Category::Electronics),
            _ => Err(DomainError::validation(
                "category must be one of: Plumbing, Electronics",
            )),
        }
    }
}

/// Stock badge shown next to a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockLevel {
    Low,
    Medium,
    Healthy,
}

impl StockLevel {
    pub fn for_stock(stock: i64) -> Self {
        if stock < LOW_STOCK_THRESHOLD {
            StockLevel::Low
        } else if stock < MEDIUM_STOCK_THRESHOLD {
            StockLevel::Medium
        } else {
            StockLevel::Healthy
        }
    }
}

/// A catalog record.
///
/// Fields the catalog does not know about (e.g. a `unit` added by an
/// imported file) are kept in `extra` and written back out unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: Category,
    pub stock: i64,
    pub price: f64,
    pub sku: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    pub fn stock_level(&self) -> StockLevel {
        StockLevel::for_stock(self.stock)
    }

    /// Merge `patch` over this record and return the result.
    ///
    /// Provided fields overwrite, omitted ones keep their value. For stock and
    /// price an empty string counts as omitted; an explicit zero is applied.
    /// On error `self` is untouched (the merge works on a copy).
    pub fn patched(&self, patch: ProductPatch, policy: NumericPolicy) -> DomainResult<Product> {
        let mut next = self.clone();

        if let Some(stock) = patch.stock.filter(|s| !s.is_blank()) {
            next.stock = policy.stock(&stock)?;
        }
        if let Some(price) = patch.price.filter(|p| !p.is_blank()) {
            next.price = policy.price(&price)?;
        }
        if let Some(name) = patch.name {
            next.name = name;
        }
        if let Some(category) = patch.category {
            next.category = category;
        }
        if let Some(sku) = patch.sku {
            next.sku = sku;
        }
        for (key, value) in patch.extra {
            if key != ID_FIELD {
                next.extra.insert(key, value);
            }
        }

        Ok(next)
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Input for a new product (id not yet assigned).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub stock: NumericInput,
    #[serde(default)]
    pub price: NumericInput,
    #[serde(default)]
    pub sku: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProductDraft {
    pub fn new(
        name: impl Into<String>,
        category: Category,
        sku: impl Into<String>,
        stock: impl Into<NumericInput>,
        price: impl Into<NumericInput>,
    ) -> Self {
        Self {
            name: name.into(),
            category,
            stock: stock.into(),
            price: price.into(),
            sku: sku.into(),
            extra: Map::new(),
        }
    }

    /// Turn the draft into a stored record under `id`.
    pub fn into_product(self, id: ProductId, policy: NumericPolicy) -> DomainResult<Product> {
        let stock = policy.stock(&self.stock)?;
        let price = policy.price(&self.price)?;

        let mut extra = self.extra;
        extra.remove(ID_FIELD);

        Ok(Product {
            id,
            name: self.name,
            category: self.category,
            stock,
            price,
            sku: self.sku,
            extra,
        })
    }
}

/// Partial update for an existing product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<NumericInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<NumericInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProductPatch {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_stock(mut self, stock: impl Into<NumericInput>) -> Self {
        self.stock = Some(stock.into());
        self
    }

    pub fn with_price(mut self, price: impl Into<NumericInput>) -> Self {
        self.price = Some(price.into());
        self
    }

    pub fn with_sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = Some(sku.into());
        self
    }
}

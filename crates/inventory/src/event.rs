use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use inventrobil_core::{BillingRecordId, ProductId};
use inventrobil_events::Event;

/// Change notification published by the inventory store after each mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InventoryEvent {
    ProductAdded {
        product_id: ProductId,
        occurred_at: DateTime<Utc>,
    },
    ProductUpdated {
        product_id: ProductId,
        occurred_at: DateTime<Utc>,
    },
    ProductDeleted {
        product_id: ProductId,
        occurred_at: DateTime<Utc>,
    },
    StockUpdated {
        product_id: ProductId,
        stock: i64,
        occurred_at: DateTime<Utc>,
    },
    InventoryImported {
        total_products: usize,
        occurred_at: DateTime<Utc>,
    },
    BillingRecorded {
        record_id: BillingRecordId,
        occurred_at: DateTime<Utc>,
    },
}

impl InventoryEvent {
    /// Product the event is about, if it concerns a single product.
    pub fn product_id(&self) -> Option<ProductId> {
        match self {
            InventoryEvent::ProductAdded { product_id, .. }
            | InventoryEvent::ProductUpdated { product_id, .. }
            | InventoryEvent::ProductDeleted { product_id, .. }
            | InventoryEvent::StockUpdated { product_id, .. } => Some(*product_id),
            InventoryEvent::InventoryImported { .. } | InventoryEvent::BillingRecorded { .. } => None,
        }
    }
}

impl Event for InventoryEvent {
    fn event_type(&self) -> &'static str {
        match self {
            InventoryEvent::ProductAdded { .. } => "inventory.product.added",
            InventoryEvent::ProductUpdated { .. } => "inventory.product.updated",
            InventoryEvent::ProductDeleted { .. } => "inventory.product.deleted",
            InventoryEvent::StockUpdated { .. } => "inventory.product.stock_updated",
            InventoryEvent::InventoryImported { .. } => "inventory.imported",
            InventoryEvent::BillingRecorded { .. } => "billing.record.added",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            InventoryEvent::ProductAdded { occurred_at, .. }
            | InventoryEvent::ProductUpdated { occurred_at, .. }
            | InventoryEvent::ProductDeleted { occurred_at, .. }
            | InventoryEvent::StockUpdated { occurred_at, .. }
            | InventoryEvent::InventoryImported { occurred_at, .. }
            | InventoryEvent::BillingRecorded { occurred_at, .. } => *occurred_at,
        }
    }
}

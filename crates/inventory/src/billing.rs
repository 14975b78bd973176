//! Billing history records and checkout input.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use inventrobil_core::{BillingRecordId, DomainError, DomainResult, Entity, ProductId};

use crate::product::Product;

/// Line name recorded when the sold product no longer exists.
pub const UNKNOWN_PRODUCT: &str = "Unknown Product";

/// Unit recorded when the product does not carry one.
pub const DEFAULT_UNIT: &str = "pc";

/// ISO-8601 UTC timestamp with millisecond precision (`2026-10-16T09:30:00.000Z`).
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// An entry in the billing history.
///
/// The store assigns `id` and `timestamp`; everything else is whatever the
/// caller supplied and is kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingRecord {
    pub id: BillingRecordId,
    pub timestamp: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl BillingRecord {
    /// Build a record. Caller fields named `id` or `timestamp` are dropped so
    /// the store-assigned values always win.
    pub fn new(id: BillingRecordId, at: DateTime<Utc>, mut fields: Map<String, Value>) -> Self {
        fields.remove("id");
        fields.remove("timestamp");
        Self {
            id,
            timestamp: iso_timestamp(at),
            fields,
        }
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Grand total, when the record carries a numeric `total`.
    pub fn total(&self) -> Option<f64> {
        self.fields.get("total").and_then(Value::as_f64)
    }
}

impl Entity for BillingRecord {
    type Id = BillingRecordId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// One line of a checkout: which product, how many.
///
/// Anything else the client sends along (name, price snapshot, ...) rides
/// in `extra` and ends up in the billing record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleLine {
    pub id: ProductId,
    pub quantity: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SaleLine {
    pub fn new(id: ProductId, quantity: i64) -> Self {
        Self {
            id,
            quantity,
            extra: Map::new(),
        }
    }

    /// Stamp the product as it is right now onto the line, overwriting
    /// whatever the client sent for those fields. A missing product is
    /// recorded as "Unknown Product" at price 0.
    pub fn snapshot(&mut self, product: Option<&Product>) {
        let (name, price, category, sku, unit) = match product {
            Some(p) => (
                p.name.as_str(),
                p.price,
                p.category.as_str(),
                p.sku.as_str(),
                p.extra
                    .get("unit")
                    .and_then(Value::as_str)
                    .unwrap_or(DEFAULT_UNIT),
            ),
            None => (UNKNOWN_PRODUCT, 0.0, "", "", DEFAULT_UNIT),
        };

        let fields = [
            ("name", Value::from(name)),
            ("price", Value::from(price)),
            ("category", Value::from(category)),
            ("sku", Value::from(sku)),
            ("unit", Value::from(unit)),
        ];
        for (key, value) in fields {
            self.extra.insert(key.to_string(), value);
        }
    }
}

/// A completed checkout, as submitted by the point-of-sale screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub items: Vec<SaleLine>,
    pub subtotal: f64,
    #[serde(default)]
    pub discount_percent: f64,
    #[serde(default)]
    pub discount_amount: f64,
    #[serde(default)]
    pub gst_rate: f64,
    #[serde(default)]
    pub gst_amount: f64,
    pub total: f64,
}

impl Sale {
    pub fn validate(&self) -> DomainResult<()> {
        if self.items.is_empty() {
            return Err(DomainError::validation("sale must contain at least one item"));
        }
        if let Some(line) = self.items.iter().find(|line| line.quantity <= 0) {
            return Err(DomainError::validation(format!(
                "quantity for product {} must be positive",
                line.id
            )));
        }
        Ok(())
    }

    /// The sale as billing-record fields (`items`, `subtotal`, `discountPercent`, ...).
    pub fn into_fields(self) -> DomainResult<Map<String, Value>> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(DomainError::validation(format!(
                "sale did not serialize to an object: {other}"
            ))),
            Err(e) => Err(DomainError::validation(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap()
    }

    #[test]
    fn record_serializes_flat_with_store_fields_winning() {
        let fields = json!({ "id": 1, "timestamp": "yesterday", "total": 42.5, "note": "cash" });
        let Value::Object(fields) = fields else { unreachable!() };

        let record = BillingRecord::new(BillingRecordId::new(1_792_143_000_000), at(), fields);
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["id"], json!(1_792_143_000_000i64));
        assert_eq!(value["timestamp"], json!("2026-10-16T09:30:00.000Z"));
        assert_eq!(value["note"], json!("cash"));
        assert_eq!(record.total(), Some(42.5));
    }

    #[test]
    fn sale_becomes_camel_case_fields() {
        let sale = Sale {
            items: vec![SaleLine::new(ProductId::new(2), 3)],
            subtotal: 46.5,
            discount_percent: 10.0,
            discount_amount: 4.65,
            gst_rate: 18.0,
            gst_amount: 7.53,
            total: 49.38,
        };

        let fields = sale.into_fields().unwrap();
        assert_eq!(fields["items"], json!([{ "id": 2, "quantity": 3 }]));
        assert_eq!(fields["discountPercent"], json!(10.0));
        assert_eq!(fields["gstAmount"], json!(7.53));
        assert_eq!(fields["total"], json!(49.38));
    }

    #[test]
    fn sale_rejects_empty_and_non_positive_lines() {
        let mut sale: Sale = serde_json::from_value(json!({
            "items": [],
            "subtotal": 0,
            "total": 0
        }))
        .unwrap();
        assert!(matches!(sale.validate(), Err(DomainError::Validation(_))));

        sale.items.push(SaleLine::new(ProductId::new(1), 0));
        assert!(matches!(sale.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn snapshot_copies_current_product_details() {
        let products = crate::seed::sample_products();
        let mut line: SaleLine = serde_json::from_value(json!({
            "id": 2,
            "quantity": 1,
            "name": "stale name",
            "note": "gift"
        }))
        .unwrap();

        line.snapshot(products.iter().find(|p| p.id == ProductId::new(2)));
        let value = serde_json::to_value(&line).unwrap();

        assert_eq!(value["name"], json!("Copper Wire 2.5mm"));
        assert_eq!(value["price"], json!(15.5));
        assert_eq!(value["category"], json!("Electronics"));
        assert_eq!(value["sku"], json!("COP001"));
        assert_eq!(value["unit"], json!("pc"));
        assert_eq!(value["note"], json!("gift"));
    }

    #[test]
    fn snapshot_of_missing_product_is_unknown_at_zero() {
        let mut line = SaleLine::new(ProductId::new(77), 2);
        line.snapshot(None);

        assert_eq!(line.extra["name"], json!(UNKNOWN_PRODUCT));
        assert_eq!(line.extra["price"], json!(0.0));
        assert_eq!(line.extra["sku"], json!(""));
    }
}

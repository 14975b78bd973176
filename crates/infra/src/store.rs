//! Inventory state manager.
//!
//! `InventoryStore` owns the product list and the billing history. It is
//! loaded once from a [`KeyValueStore`] at construction and writes the
//! affected list back synchronously after every mutation. Storage failures
//! are logged and swallowed: the in-memory state stays authoritative for
//! the rest of the session.
//!
//! After each successful mutation an [`InventoryEvent`] is published on the
//! store's bus so a rendering layer can refresh.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use inventrobil_core::{
    BillingRecordId, DomainError, DomainResult, ProductId, find_by_id, position_of,
};
use inventrobil_events::{EventBus, InMemoryEventBus, Subscription};
use inventrobil_inventory::{
    BillingRecord, DashboardStats, InventoryEvent, InventoryExport, NumericPolicy, Product,
    ProductDraft, ProductFilter, ProductPatch, Sale, parse_import, sample_products,
};

use crate::clock::{Clock, SystemClock};
use crate::storage::{KeyValueStore, StorageError, StorageResult};

/// Storage key holding the JSON-encoded product list.
pub const PRODUCTS_KEY: &str = "inventrobil_inventory";

/// Storage key holding the JSON-encoded billing history (newest first).
pub const BILLING_KEY: &str = "inventrobil_billing";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    pub numeric_policy: NumericPolicy,
    pub products_key: String,
    pub billing_key: String,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            numeric_policy: NumericPolicy::default(),
            products_key: PRODUCTS_KEY.to_string(),
            billing_key: BILLING_KEY.to_string(),
        }
    }
}

impl StoreOptions {
    pub fn with_numeric_policy(mut self, policy: NumericPolicy) -> Self {
        self.numeric_policy = policy;
        self
    }
}

#[derive(Debug)]
pub struct InventoryStore<S> {
    storage: S,
    clock: Arc<dyn Clock>,
    options: StoreOptions,
    products: Vec<Product>,
    billing_history: Vec<BillingRecord>,
    bus: Arc<InMemoryEventBus<InventoryEvent>>,
}

impl<S: KeyValueStore> InventoryStore<S> {
    /// Load state from `storage` (seeding the sample catalog if it is empty).
    pub fn open(storage: S, options: StoreOptions) -> Self {
        Self::open_with_clock(storage, options, Arc::new(SystemClock))
    }

    pub fn open_with_clock(storage: S, options: StoreOptions, clock: Arc<dyn Clock>) -> Self {
        let mut store = Self {
            storage,
            clock,
            options,
            products: Vec::new(),
            billing_history: Vec::new(),
            bus: Arc::new(InMemoryEventBus::new()),
        };
        store.load();
        store
    }

    fn load(&mut self) {
        match self.read_list::<Product>(&self.options.products_key) {
            Ok(Some(products)) => {
                tracing::info!(count = products.len(), "loaded stored inventory");
                self.products = products;
            }
            Ok(None) => {
                tracing::info!("no stored inventory; seeding sample catalog");
                self.products = sample_products();
                self.save_products();
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to load inventory; using sample catalog");
                self.products = sample_products();
            }
        }

        match self.read_list::<BillingRecord>(&self.options.billing_key) {
            Ok(Some(history)) => self.billing_history = history,
            Ok(None) => self.billing_history = Vec::new(),
            Err(err) => {
                tracing::error!(error = %err, "failed to load billing history; starting empty");
                self.billing_history = Vec::new();
            }
        }
    }

    fn read_list<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Option<Vec<T>>> {
        let Some(raw) = self.storage.get(key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| StorageError::deserialization(key, e.to_string()))
    }

    fn write_list<T: Serialize>(&self, key: &str, items: &[T]) -> StorageResult<()> {
        let raw =
            serde_json::to_string(items).map_err(|e| StorageError::serialization(e.to_string()))?;
        self.storage.set(key, &raw)
    }

    fn save_products(&self) {
        if let Err(err) = self.write_list(&self.options.products_key, &self.products) {
            tracing::error!(key = %self.options.products_key, error = %err, "failed to persist products");
        }
    }

    fn save_billing(&self) {
        if let Err(err) = self.write_list(&self.options.billing_key, &self.billing_history) {
            tracing::error!(key = %self.options.billing_key, error = %err, "failed to persist billing history");
        }
    }

    fn publish(&self, event: InventoryEvent) {
        if let Err(err) = self.bus.publish(event) {
            tracing::warn!(error = ?err, "failed to publish inventory event");
        }
    }

    fn next_product_id(&self) -> DomainResult<ProductId> {
        match self.products.iter().map(|p| p.id).max() {
            None => Ok(ProductId::new(1)),
            Some(max) => max.next().ok_or_else(|| {
                DomainError::validation(format!("no product id left after {max}"))
            }),
        }
    }

    /// Epoch millis of `now`, bumped past the newest record if the clock hasn't moved on.
    fn next_billing_id(&self, now_millis: i64) -> BillingRecordId {
        let newest = self.billing_history.iter().map(|r| r.id.value()).max();
        match newest {
            Some(newest) if newest >= now_millis => BillingRecordId::new(newest + 1),
            _ => BillingRecordId::new(now_millis),
        }
    }

    pub fn add_product(&mut self, draft: ProductDraft) -> DomainResult<Product> {
        let id = self.next_product_id()?;
        let product = draft.into_product(id, self.options.numeric_policy)?;

        self.products.push(product.clone());
        self.save_products();

        tracing::debug!(product_id = %id, sku = %product.sku, "product added");
        self.publish(InventoryEvent::ProductAdded {
            product_id: id,
            occurred_at: self.clock.now(),
        });
        Ok(product)
    }

    /// Merge `patch` into product `id`. Unknown ids are a silent no-op (`Ok(None)`).
    pub fn update_product(
        &mut self,
        id: ProductId,
        patch: ProductPatch,
    ) -> DomainResult<Option<Product>> {
        let Some(index) = position_of(&self.products, &id) else {
            tracing::debug!(product_id = %id, "update for unknown product ignored");
            return Ok(None);
        };

        let updated = self.products[index].patched(patch, self.options.numeric_policy)?;
        self.products[index] = updated.clone();
        self.save_products();

        tracing::debug!(product_id = %id, "product updated");
        self.publish(InventoryEvent::ProductUpdated {
            product_id: id,
            occurred_at: self.clock.now(),
        });
        Ok(Some(updated))
    }

    /// Remove every product carrying `id`. Returns whether anything was removed.
    pub fn delete_product(&mut self, id: ProductId) -> bool {
        let before = self.products.len();
        self.products.retain(|p| p.id != id);
        if self.products.len() == before {
            tracing::debug!(product_id = %id, "delete for unknown product ignored");
            return false;
        }

        self.save_products();
        tracing::debug!(product_id = %id, "product deleted");
        self.publish(InventoryEvent::ProductDeleted {
            product_id: id,
            occurred_at: self.clock.now(),
        });
        true
    }

    /// Set the stock of product `id`, clamping negatives to zero.
    pub fn update_stock(&mut self, id: ProductId, new_stock: i64) -> Option<Product> {
        let Some(index) = position_of(&self.products, &id) else {
            tracing::debug!(product_id = %id, "stock update for unknown product ignored");
            return None;
        };

        let stock = new_stock.max(0);
        self.products[index].stock = stock;
        self.save_products();

        self.publish(InventoryEvent::StockUpdated {
            product_id: id,
            stock,
            occurred_at: self.clock.now(),
        });
        Some(self.products[index].clone())
    }

    pub fn get_product(&self, id: ProductId) -> Option<Product> {
        find_by_id(&self.products, &id).cloned()
    }

    pub fn get_all_products(&self) -> Vec<Product> {
        self.products.clone()
    }

    pub fn get_billing_history(&self) -> Vec<BillingRecord> {
        self.billing_history.clone()
    }

    pub fn search(&self, filter: &ProductFilter) -> Vec<Product> {
        filter.apply(&self.products).into_iter().cloned().collect()
    }

    pub fn stats(&self) -> DashboardStats {
        DashboardStats::compute(&self.products, &self.billing_history)
    }

    /// Prepend a billing record built from `fields`; id and timestamp are assigned here.
    pub fn add_billing_record(&mut self, fields: Map<String, Value>) -> BillingRecord {
        let now = self.clock.now();
        let id = self.next_billing_id(now.timestamp_millis());
        let record = BillingRecord::new(id, now, fields);

        self.billing_history.insert(0, record.clone());
        self.save_billing();

        tracing::debug!(record_id = %id, "billing record added");
        self.publish(InventoryEvent::BillingRecorded {
            record_id: id,
            occurred_at: now,
        });
        record
    }

    /// Checkout: take the sold quantities out of stock and record the bill.
    ///
    /// Each line is stamped with the product's name, price, category, sku
    /// and unit as they are at the time of sale.
    ///
    /// Stock for every line is checked before anything changes, so an
    /// insufficient line leaves both stock and history untouched. Lines for
    /// products that no longer exist are billed without a stock movement.
    pub fn record_sale(&mut self, mut sale: Sale) -> DomainResult<BillingRecord> {
        sale.validate()?;

        let mut movements: Vec<(usize, i64)> = Vec::new();
        for line in &sale.items {
            let Some(index) = position_of(&self.products, &line.id) else {
                tracing::warn!(product_id = %line.id, "sale line for unknown product; stock not adjusted");
                continue;
            };
            let product = &self.products[index];
            let available = movements
                .iter()
                .rev()
                .find(|(i, _)| *i == index)
                .map(|(_, stock)| *stock)
                .unwrap_or(product.stock);

            if available < line.quantity {
                return Err(DomainError::invariant(format!(
                    "Insufficient stock for {}",
                    product.name
                )));
            }
            movements.push((index, available - line.quantity));
        }

        for line in &mut sale.items {
            let product = find_by_id(&self.products, &line.id);
            line.snapshot(product);
        }
        let fields = sale.into_fields()?;

        if !movements.is_empty() {
            for (index, stock) in &movements {
                self.products[*index].stock = *stock;
            }
            self.save_products();

            let now = self.clock.now();
            for (index, stock) in movements {
                self.publish(InventoryEvent::StockUpdated {
                    product_id: self.products[index].id,
                    stock,
                    occurred_at: now,
                });
            }
        }

        Ok(self.add_billing_record(fields))
    }

    pub fn export_inventory(&self) -> InventoryExport {
        InventoryExport::new(self.products.clone(), self.clock.now())
    }

    /// Replace the whole product list with `data.products`.
    ///
    /// No merge, no renumbering, no duplicate detection. A malformed document
    /// is a [`DomainError::Format`] and leaves the current list in place.
    pub fn import_inventory(&mut self, data: &Value) -> DomainResult<usize> {
        let products = parse_import(data)?;
        let count = products.len();

        self.products = products;
        self.save_products();

        tracing::info!(count, "inventory imported");
        self.publish(InventoryEvent::InventoryImported {
            total_products: count,
            occurred_at: self.clock.now(),
        });
        Ok(count)
    }

    /// Change notifications for every mutation from now on.
    pub fn subscribe(&self) -> Subscription<InventoryEvent> {
        self.bus.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use inventrobil_inventory::{Category, SaleLine};
    use serde_json::json;

    use crate::clock::FixedClock;
    use crate::storage::{FileKeyValueStore, InMemoryKeyValueStore};

    fn clock() -> Arc<FixedClock> {
        Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap(),
        ))
    }

    fn open_with(storage: Arc<InMemoryKeyValueStore>, clock: Arc<FixedClock>) -> InventoryStore<Arc<InMemoryKeyValueStore>> {
        InventoryStore::open_with_clock(storage, StoreOptions::default(), clock)
    }

    fn seeded() -> InventoryStore<Arc<InMemoryKeyValueStore>> {
        open_with(Arc::new(InMemoryKeyValueStore::new()), clock())
    }

    fn nail() -> ProductDraft {
        serde_json::from_value(json!({
            "name": "Nail",
            "sku": "NL1",
            "stock": "12",
            "price": "2.5",
            "category": "Plumbing"
        }))
        .unwrap()
    }

    fn stored_products(storage: &InMemoryKeyValueStore) -> Vec<Product> {
        serde_json::from_str(&storage.get(PRODUCTS_KEY).unwrap().unwrap()).unwrap()
    }

    /// Accepts reads, fails every write.
    #[derive(Debug, Default)]
    struct ReadOnlyStorage {
        inner: InMemoryKeyValueStore,
    }

    impl KeyValueStore for ReadOnlyStorage {
        fn get(&self, key: &str) -> StorageResult<Option<String>> {
            self.inner.get(key)
        }

        fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
            Err(StorageError::unavailable("quota exceeded"))
        }
    }

    #[test]
    fn empty_storage_is_seeded_and_written_back() {
        let storage = Arc::new(InMemoryKeyValueStore::new());
        let store = open_with(storage.clone(), clock());

        assert_eq!(store.get_all_products().len(), 5);
        assert!(store.get_billing_history().is_empty());
        assert_eq!(stored_products(&storage), sample_products());
    }

    #[test]
    fn corrupt_storage_falls_back_to_sample_catalog() {
        let storage = Arc::new(InMemoryKeyValueStore::with_entries([
            (PRODUCTS_KEY, "{not json"),
            (BILLING_KEY, "42"),
        ]));
        let store = open_with(storage, clock());

        assert_eq!(store.get_all_products(), sample_products());
        assert!(store.get_billing_history().is_empty());
    }

    #[test]
    fn add_product_assigns_next_id_and_coerces_numbers() {
        let mut store = seeded();
        let product = store.add_product(nail()).unwrap();

        assert_eq!(product.id, ProductId::new(6));
        assert_eq!(product.stock, 12);
        assert_eq!(product.price, 2.5);
        assert_eq!(product.category, Category::Plumbing);
        assert_eq!(store.get_product(ProductId::new(6)), Some(product));
    }

    #[test]
    fn add_product_to_empty_list_starts_at_one() {
        let storage = Arc::new(InMemoryKeyValueStore::with_entries([(PRODUCTS_KEY, "[]")]));
        let mut store = open_with(storage, clock());

        assert_eq!(store.add_product(nail()).unwrap().id, ProductId::new(1));
    }

    #[test]
    fn strict_policy_rejects_malformed_numbers_without_mutating() {
        let mut store = seeded();
        let mut draft = nail();
        draft.stock = "a dozen".into();

        let err = store.add_product(draft).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(store.get_all_products().len(), 5);
    }

    #[test]
    fn lenient_policy_coerces_malformed_numbers() {
        let options = StoreOptions::default().with_numeric_policy(NumericPolicy::Lenient);
        let mut store =
            InventoryStore::open_with_clock(InMemoryKeyValueStore::new(), options, clock());
        let mut draft = nail();
        draft.stock = "a dozen".into();
        draft.price = "3.75 each".into();

        let product = store.add_product(draft).unwrap();
        assert_eq!(product.stock, 0);
        assert_eq!(product.price, 3.75);
    }

    #[test]
    fn update_product_merges_partial_fields() {
        let mut store = seeded();
        let id = ProductId::new(1);
        let before = store.get_product(id).unwrap();

        let updated = store
            .update_product(id, ProductPatch::default().with_stock(7i64))
            .unwrap()
            .unwrap();

        assert_eq!(updated.stock, 7);
        assert_eq!(updated.price, before.price);
        assert_eq!(updated.name, before.name);
        assert_eq!(store.get_product(id), Some(updated));
    }

    #[test]
    fn update_product_allows_explicit_zero() {
        let mut store = seeded();
        let id = ProductId::new(3);
        store
            .update_product(id, ProductPatch::default().with_stock(0i64).with_price(0.0))
            .unwrap();

        let product = store.get_product(id).unwrap();
        assert_eq!(product.stock, 0);
        assert_eq!(product.price, 0.0);
    }

    #[test]
    fn update_unknown_product_is_a_silent_no_op() {
        let mut store = seeded();
        let sub = store.subscribe();

        let result = store.update_product(ProductId::new(99), ProductPatch::default().with_name("x"));
        assert_eq!(result, Ok(None));
        assert_eq!(store.get_all_products(), sample_products());
        assert!(sub.drain().is_empty());
    }

    #[test]
    fn delete_then_get_is_not_found() {
        let storage = Arc::new(InMemoryKeyValueStore::new());
        let mut store = open_with(storage.clone(), clock());

        assert!(store.delete_product(ProductId::new(2)));
        assert_eq!(store.get_product(ProductId::new(2)), None);
        assert!(!store.delete_product(ProductId::new(2)));
        assert_eq!(stored_products(&storage).len(), 4);
    }

    #[test]
    fn update_stock_clamps_negative_to_zero() {
        let mut store = seeded();
        let product = store.update_stock(ProductId::new(1), -5).unwrap();
        assert_eq!(product.stock, 0);
        assert_eq!(store.get_product(ProductId::new(1)).unwrap().stock, 0);
        assert_eq!(store.update_stock(ProductId::new(42), 3), None);
    }

    #[test]
    fn returned_lists_are_copies() {
        let mut store = seeded();
        let mut products = store.get_all_products();
        products.clear();
        let mut history = store.get_billing_history();
        history.push(BillingRecord::new(BillingRecordId::new(1), Utc::now(), Map::new()));

        assert_eq!(store.get_all_products().len(), 5);
        assert!(store.get_billing_history().is_empty());

        store.add_billing_record(Map::new());
        assert_eq!(store.get_billing_history().len(), 1);
    }

    #[test]
    fn billing_records_are_prepended_with_timestamp_ids() {
        let clock = clock();
        let mut store = open_with(Arc::new(InMemoryKeyValueStore::new()), clock.clone());
        let start = clock.now().timestamp_millis();

        let Value::Object(fields) = json!({ "total": 12.5, "id": "ignored" }) else {
            unreachable!()
        };
        let first = store.add_billing_record(fields);
        // Same millisecond: the id still moves forward.
        let second = store.add_billing_record(Map::new());
        clock.advance(Duration::seconds(1));
        let third = store.add_billing_record(Map::new());

        assert_eq!(first.id.value(), start);
        assert_eq!(first.timestamp, "2026-10-16T09:30:00.000Z");
        assert_eq!(second.id.value(), start + 1);
        assert_eq!(third.id.value(), start + 1000);

        let ids: Vec<_> = store.get_billing_history().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![third.id, second.id, first.id]);
        assert_eq!(store.stats().total_revenue, 12.5);
    }

    #[test]
    fn record_sale_takes_stock_and_records_the_bill() {
        let mut store = seeded();
        let sale = Sale {
            items: vec![
                SaleLine::new(ProductId::new(1), 5),
                SaleLine::new(ProductId::new(1), 5),
                SaleLine::new(ProductId::new(3), 2),
                SaleLine::new(ProductId::new(77), 1),
            ],
            subtotal: 120.9,
            discount_percent: 0.0,
            discount_amount: 0.0,
            gst_rate: 0.0,
            gst_amount: 0.0,
            total: 120.9,
        };

        let record = store.record_sale(sale).unwrap();

        assert_eq!(store.get_product(ProductId::new(1)).unwrap().stock, 40);
        assert_eq!(store.get_product(ProductId::new(3)).unwrap().stock, 18);
        let items = record.field("items").and_then(Value::as_array).unwrap();
        assert_eq!(items.len(), 4);
        assert_eq!(items[2]["name"], json!("Switch Socket"));
        assert_eq!(items[2]["price"], json!(5.5));
        assert_eq!(items[2]["sku"], json!("SWT001"));
        assert_eq!(items[2]["category"], json!("Electronics"));
        assert_eq!(items[2]["unit"], json!("pc"));
        assert_eq!(items[3]["name"], json!("Unknown Product"));
        assert_eq!(items[3]["price"], json!(0.0));
        assert_eq!(record.total(), Some(120.9));
        assert_eq!(store.get_billing_history(), vec![record]);
    }

    #[test]
    fn record_sale_with_insufficient_stock_changes_nothing() {
        let mut store = seeded();
        let sale = Sale {
            items: vec![
                SaleLine::new(ProductId::new(1), 1),
                SaleLine::new(ProductId::new(2), 6),
            ],
            subtotal: 0.0,
            discount_percent: 0.0,
            discount_amount: 0.0,
            gst_rate: 0.0,
            gst_amount: 0.0,
            total: 0.0,
        };

        let err = store.record_sale(sale).unwrap_err();
        assert_eq!(err, DomainError::invariant("Insufficient stock for Copper Wire 2.5mm"));
        assert_eq!(store.get_all_products(), sample_products());
        assert!(store.get_billing_history().is_empty());
    }

    #[test]
    fn export_then_import_round_trips() {
        let mut store = seeded();
        store.add_product(nail()).unwrap();
        store.update_stock(ProductId::new(2), 0);
        let before = store.get_all_products();

        let export = store.export_inventory();
        assert_eq!(export.total_products, 6);
        assert_eq!(export.export_date, "2026-10-16T09:30:00.000Z");

        let doc = serde_json::to_value(&export).unwrap();
        let mut other = seeded();
        assert_eq!(other.import_inventory(&doc), Ok(6));
        assert_eq!(other.get_all_products(), before);
    }

    #[test]
    fn sale_lines_are_snapshotted_even_after_the_product_changes() {
        let mut store = seeded();
        let sale: Sale = serde_json::from_value(json!({
            "items": [{ "id": 5, "quantity": 2 }],
            "subtotal": 17.5,
            "total": 17.5
        }))
        .unwrap();

        store.record_sale(sale).unwrap();
        store
            .update_product(ProductId::new(5), ProductPatch::default().with_name("Junction Box").with_price(9.25))
            .unwrap();

        let history = store.get_billing_history();
        let line = &history[0].field("items").and_then(Value::as_array).unwrap()[0];
        assert_eq!(line["name"], json!("Electrical Box"));
        assert_eq!(line["price"], json!(8.75));
        assert_eq!(line["quantity"], json!(2));
    }

    #[test]
    fn prices_survive_a_storage_round_trip_bit_for_bit() {
        let storage = Arc::new(InMemoryKeyValueStore::new());
        let mut store = open_with(storage.clone(), clock());

        let mut draft = nail();
        draft.price = "14023.841699999999".into();
        store.add_product(draft).unwrap();
        for i in 0..500u32 {
            let mut draft = nail();
            draft.price = (f64::from(i) * 28.0473 + 0.1).into();
            store.add_product(draft).unwrap();
        }
        let before = store.get_all_products();
        assert_eq!(before[5].price, 14023.841699999999);

        let reopened = open_with(storage, clock());
        let after = reopened.get_all_products();
        for (a, b) in before.iter().zip(&after) {
            assert_eq!(a.price.to_bits(), b.price.to_bits(), "price of {} drifted", a.id);
        }
        assert_eq!(after, before);
    }

    #[test]
    fn add_product_fails_once_ids_run_out() {
        let mut store = seeded();
        let doc = json!({ "products": [
            { "id": u64::MAX, "name": "Last", "category": "Plumbing", "stock": 1, "price": 1.0, "sku": "LAST" }
        ]});
        store.import_inventory(&doc).unwrap();

        let err = store.add_product(nail()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(store.get_all_products().len(), 1);
    }

    #[test]
    fn import_without_products_is_a_format_error_and_keeps_state() {
        let storage = Arc::new(InMemoryKeyValueStore::new());
        let mut store = open_with(storage.clone(), clock());

        let err = store.import_inventory(&json!({})).unwrap_err();
        assert!(matches!(err, DomainError::Format(_)));
        assert_eq!(store.get_all_products(), sample_products());
        assert_eq!(stored_products(&storage), sample_products());
    }

    #[test]
    fn import_replaces_without_renumbering() {
        let mut store = seeded();
        let doc = json!({ "products": [
            { "id": 10, "name": "A", "category": "Plumbing", "stock": 1, "price": 1.5, "sku": "A" },
            { "id": 10, "name": "B", "category": "Electronics", "stock": 2, "price": 2.5, "sku": "B" }
        ]});

        assert_eq!(store.import_inventory(&doc), Ok(2));
        assert_eq!(store.get_product(ProductId::new(10)).unwrap().name, "A");
        assert_eq!(store.add_product(nail()).unwrap().id, ProductId::new(11));
    }

    #[test]
    fn mutations_publish_events_in_order() {
        let mut store = seeded();
        let sub = store.subscribe();

        let added = store.add_product(nail()).unwrap();
        store.update_stock(added.id, 3);
        store.delete_product(added.id);
        store.update_stock(ProductId::new(123), 3);

        let types: Vec<_> = sub
            .drain()
            .into_iter()
            .map(|e| (inventrobil_events::Event::event_type(&e), e.product_id()))
            .collect();
        assert_eq!(
            types,
            vec![
                ("inventory.product.added", Some(added.id)),
                ("inventory.product.stock_updated", Some(added.id)),
                ("inventory.product.deleted", Some(added.id)),
            ]
        );
    }

    #[test]
    fn write_failures_are_swallowed() {
        let mut store = InventoryStore::open_with_clock(
            ReadOnlyStorage::default(),
            StoreOptions::default(),
            clock(),
        );

        let product = store.add_product(nail()).unwrap();
        assert_eq!(store.get_product(product.id), Some(product));
        assert_eq!(store.get_all_products().len(), 6);
    }

    #[test]
    fn state_survives_reopening_file_storage() {
        let dir = tempfile::TempDir::new().unwrap();
        {
            let storage = FileKeyValueStore::open(dir.path()).unwrap();
            let mut store = InventoryStore::open(storage, StoreOptions::default());
            store.add_product(nail()).unwrap();
            store.delete_product(ProductId::new(1));
            store.add_billing_record(Map::new());
        }

        let storage = FileKeyValueStore::open(dir.path()).unwrap();
        let store = InventoryStore::open(storage, StoreOptions::default());
        let skus: Vec<_> = store.get_all_products().into_iter().map(|p| p.sku).collect();
        assert_eq!(skus, vec!["COP001", "SWT001", "PVC002", "ELB001", "NL1"]);
        assert_eq!(store.get_billing_history().len(), 1);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 128,
                ..ProptestConfig::default()
            })]

            /// Ids from successive adds are unique and strictly increasing,
            /// whatever deletes happen in between.
            #[test]
            fn added_ids_strictly_increase(ops in proptest::collection::vec(any::<bool>(), 1..40)) {
                let mut store = seeded();
                let mut last = ProductId::new(5);

                for add in ops {
                    if add {
                        let id = store.add_product(nail()).unwrap().id;
                        prop_assert!(id > last);
                        last = id;
                    } else {
                        store.delete_product(ProductId::new(1));
                    }
                }

                let mut ids: Vec<_> = store.get_all_products().iter().map(|p| p.id).collect();
                let total = ids.len();
                ids.dedup();
                prop_assert_eq!(ids.len(), total);
            }

            /// Stock set through `update_stock` is never negative.
            #[test]
            fn stock_is_clamped(stock in any::<i64>()) {
                let mut store = seeded();
                let product = store.update_stock(ProductId::new(4), stock).unwrap();
                prop_assert_eq!(product.stock, stock.max(0));
            }
        }
    }
}

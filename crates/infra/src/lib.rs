//! Infrastructure: durable key/value storage and the inventory store.

pub mod clock;
pub mod storage;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use storage::{
    FileKeyValueStore, InMemoryKeyValueStore, KeyValueStore, StorageError, StorageResult,
};
pub use store::{BILLING_KEY, InventoryStore, PRODUCTS_KEY, StoreOptions};

//! Durable string key/value storage.
//!
//! The inventory store keeps each list as one JSON-encoded value under a
//! fixed key. Backends only move strings; they know nothing about products.

mod error;
mod file;
mod memory;

use std::sync::Arc;

pub use error::{StorageError, StorageResult};
pub use file::FileKeyValueStore;
pub use memory::InMemoryKeyValueStore;

/// Synchronous string key/value store.
pub trait KeyValueStore: Send + Sync {
    /// Value stored under `key`, or `None` if nothing was ever written.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Replace the value under `key`.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
}

impl<S> KeyValueStore for Arc<S>
where
    S: KeyValueStore + ?Sized,
{
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }
}

impl<S> KeyValueStore for Box<S>
where
    S: KeyValueStore + ?Sized,
{
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }
}

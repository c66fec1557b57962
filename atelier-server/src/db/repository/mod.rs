//! Repository Module
//!
//! Typed CRUD over the store adapter, one repository per table.

pub mod admin;
pub mod order;
pub mod product;

// Re-exports
pub use admin::AdminRepository;
pub use order::OrderRepository;
pub use product::ProductRepository;

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::store::{Store, StoreError, StoreHandle, StoreResult};

/// Base repository with a shared store handle
#[derive(Clone)]
pub struct BaseRepository {
    store: StoreHandle,
}

impl BaseRepository {
    pub fn new(store: StoreHandle) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }
}

/// Decode a store record into a typed model
pub(crate) fn decode<T: DeserializeOwned>(value: Value) -> StoreResult<T> {
    serde_json::from_value(value).map_err(|e| StoreError::Decode(e.to_string()))
}

/// Decode a list of store records
pub(crate) fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>) -> StoreResult<Vec<T>> {
    rows.into_iter().map(decode).collect()
}

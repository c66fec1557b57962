//! Store Adapter Interface
//!
//! The application never talks SQL. All persistence goes through the [`Store`]
//! trait, whose operations mirror what the hosted database service exposes:
//! fetch/list/insert/update/delete plus an atomic conditional decrement used
//! for stock reservation.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Store error types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store request failed: {0}")]
    Request(String),

    #[error("store returned malformed data: {0}")]
    Decode(String),

    #[error("store rejected the operation: {0}")]
    Rejected(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Decode(e.to_string())
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Shared handle to a store backend
pub type StoreHandle = Arc<dyn Store>;

/// Equality filter over table columns
///
/// ```ignore
/// let filter = Filter::new().eq("order_id", 42);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Filter {
    clauses: Vec<(String, Value)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an equality clause
    pub fn eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.clauses.push((column.to_string(), value.into()));
        self
    }

    pub fn clauses(&self) -> &[(String, Value)] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Check a JSON record against every clause
    pub fn matches(&self, record: &Value) -> bool {
        self.clauses
            .iter()
            .all(|(column, value)| record.get(column) == Some(value))
    }

    /// Render as PostgREST query pairs (`column=eq.value`)
    pub fn to_query(&self) -> Vec<(String, String)> {
        self.clauses
            .iter()
            .map(|(column, value)| {
                let rendered = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (column.clone(), format!("eq.{}", rendered))
            })
            .collect()
    }
}

/// Store backend interface
///
/// Every operation is a single network call against the hosted service; there
/// are no cross-call transactions and no automatic retries. Failures surface
/// as [`StoreError`] and propagate to the caller.
#[async_trait]
pub trait Store: Send + Sync {
    /// Fetch the first record matching the filter
    async fn get(&self, table: &str, filter: &Filter) -> StoreResult<Option<Value>>;

    /// List records matching the filter
    ///
    /// `order_by` uses `column.asc` / `column.desc` notation.
    async fn list(
        &self,
        table: &str,
        filter: &Filter,
        order_by: Option<&str>,
    ) -> StoreResult<Vec<Value>>;

    /// Insert a record, returning it with its assigned id
    async fn insert(&self, table: &str, record: Value) -> StoreResult<Value>;

    /// Apply a partial update to the record with the given id
    ///
    /// Returns `None` when no such record exists.
    async fn update(&self, table: &str, id: i64, patch: Value) -> StoreResult<Option<Value>>;

    /// Delete the record with the given id, returning whether it existed
    async fn delete(&self, table: &str, id: i64) -> StoreResult<bool>;

    /// Atomically decrement a numeric field, but only if `current >= amount`
    ///
    /// Returns `false` when the condition does not hold (or the record is
    /// missing). A `false` here is the authoritative out-of-stock signal for
    /// inventory reservation.
    async fn decrement(&self, table: &str, id: i64, field: &str, amount: i64)
    -> StoreResult<bool>;
}

//! In-memory store backend
//!
//! Used when `STORE_URL` is not configured (local development) and by the
//! test suite. Tables live behind a single async mutex, which makes every
//! operation atomic, including the conditional decrement.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use super::store::{Filter, Store, StoreError, StoreResult};

#[derive(Debug, Default)]
struct Table {
    next_id: i64,
    rows: Vec<Value>,
}

/// In-memory table map with autoincrement ids
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<String, Table>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn row_id(row: &Value) -> Option<i64> {
    row.get("id").and_then(Value::as_i64)
}

fn compare(a: &Value, b: &Value) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get(&self, table: &str, filter: &Filter) -> StoreResult<Option<Value>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .get(table)
            .and_then(|t| t.rows.iter().find(|row| filter.matches(row)).cloned()))
    }

    async fn list(
        &self,
        table: &str,
        filter: &Filter,
        order_by: Option<&str>,
    ) -> StoreResult<Vec<Value>> {
        let tables = self.tables.lock().await;
        let mut rows: Vec<Value> = tables
            .get(table)
            .map(|t| {
                t.rows
                    .iter()
                    .filter(|row| filter.matches(row))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(order) = order_by {
            let (column, descending) = match order.rsplit_once('.') {
                Some((column, "desc")) => (column, true),
                Some((column, "asc")) => (column, false),
                _ => (order, false),
            };
            rows.sort_by(|a, b| {
                let ordering = compare(
                    a.get(column).unwrap_or(&Value::Null),
                    b.get(column).unwrap_or(&Value::Null),
                );
                if descending { ordering.reverse() } else { ordering }
            });
        }

        Ok(rows)
    }

    async fn insert(&self, table: &str, mut record: Value) -> StoreResult<Value> {
        let obj = record
            .as_object_mut()
            .ok_or_else(|| StoreError::Rejected("record must be a JSON object".to_string()))?;

        let mut tables = self.tables.lock().await;
        let t = tables.entry(table.to_string()).or_default();
        t.next_id += 1;
        obj.insert("id".to_string(), Value::from(t.next_id));

        t.rows.push(record.clone());
        Ok(record)
    }

    async fn update(&self, table: &str, id: i64, patch: Value) -> StoreResult<Option<Value>> {
        let patch = patch
            .as_object()
            .ok_or_else(|| StoreError::Rejected("patch must be a JSON object".to_string()))?
            .clone();

        let mut tables = self.tables.lock().await;
        let Some(t) = tables.get_mut(table) else {
            return Ok(None);
        };

        let Some(row) = t.rows.iter_mut().find(|row| row_id(row) == Some(id)) else {
            return Ok(None);
        };

        let obj = row
            .as_object_mut()
            .ok_or_else(|| StoreError::Decode("stored record is not an object".to_string()))?;
        for (key, value) in patch {
            obj.insert(key, value);
        }

        Ok(Some(row.clone()))
    }

    async fn delete(&self, table: &str, id: i64) -> StoreResult<bool> {
        let mut tables = self.tables.lock().await;
        let Some(t) = tables.get_mut(table) else {
            return Ok(false);
        };
        let before = t.rows.len();
        t.rows.retain(|row| row_id(row) != Some(id));
        Ok(t.rows.len() < before)
    }

    async fn decrement(
        &self,
        table: &str,
        id: i64,
        field: &str,
        amount: i64,
    ) -> StoreResult<bool> {
        let mut tables = self.tables.lock().await;
        let Some(t) = tables.get_mut(table) else {
            return Ok(false);
        };
        let Some(row) = t.rows.iter_mut().find(|row| row_id(row) == Some(id)) else {
            return Ok(false);
        };

        let current = row.get(field).and_then(Value::as_i64).ok_or_else(|| {
            StoreError::Decode(format!("field {} is not an integer", field))
        })?;

        if current < amount {
            return Ok(false);
        }

        row[field] = Value::from(current - amount);
        Ok(true)
    }
}

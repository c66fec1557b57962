//! Hosted store backend (PostgREST-style REST interface)
//!
//! Speaks the query dialect exposed by hosted Postgres services (Supabase and
//! friends): equality filters as `column=eq.value` query parameters, partial
//! updates via `PATCH`, and `Prefer: return=representation` to get affected
//! rows back.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde_json::{Value, json};

use async_trait::async_trait;

use super::store::{Filter, Store, StoreError, StoreResult};

/// Retry bound for the compare-and-swap decrement
const MAX_CAS_ATTEMPTS: u32 = 8;

impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        StoreError::Request(e.to_string())
    }
}

/// Store backend over a hosted PostgREST endpoint
#[derive(Debug, Clone)]
pub struct PostgrestStore {
    base_url: String,
    client: reqwest::Client,
}

impl PostgrestStore {
    /// Create a client against `base_url`, authenticating with the service key
    pub fn new(base_url: &str, service_key: &str) -> StoreResult<Self> {
        let mut headers = HeaderMap::new();
        if !service_key.is_empty() {
            let apikey = HeaderValue::from_str(service_key)
                .map_err(|e| StoreError::Request(format!("Invalid service key: {}", e)))?;
            let bearer = HeaderValue::from_str(&format!("Bearer {}", service_key))
                .map_err(|e| StoreError::Request(format!("Invalid service key: {}", e)))?;
            headers.insert("apikey", apikey);
            headers.insert(AUTHORIZATION, bearer);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| StoreError::Request(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.base_url, table)
    }

    /// Check the response status and decode the affected rows
    async fn expect_rows(response: reqwest::Response) -> StoreResult<Vec<Value>> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Rejected(format!("{}: {}", status, body)));
        }
        response
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }
}

#[async_trait]
impl Store for PostgrestStore {
    async fn get(&self, table: &str, filter: &Filter) -> StoreResult<Option<Value>> {
        let mut query = filter.to_query();
        query.push(("limit".to_string(), "1".to_string()));

        let response = self
            .client
            .get(self.table_url(table))
            .query(&query)
            .send()
            .await?;

        let rows = Self::expect_rows(response).await?;
        Ok(rows.into_iter().next())
    }

    async fn list(
        &self,
        table: &str,
        filter: &Filter,
        order_by: Option<&str>,
    ) -> StoreResult<Vec<Value>> {
        let mut query = filter.to_query();
        if let Some(order) = order_by {
            query.push(("order".to_string(), order.to_string()));
        }

        let response = self
            .client
            .get(self.table_url(table))
            .query(&query)
            .send()
            .await?;

        Self::expect_rows(response).await
    }

    async fn insert(&self, table: &str, record: Value) -> StoreResult<Value> {
        let response = self
            .client
            .post(self.table_url(table))
            .header("Prefer", "return=representation")
            .json(&record)
            .send()
            .await?;

        let rows = Self::expect_rows(response).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::Decode("insert returned no rows".to_string()))
    }

    async fn update(&self, table: &str, id: i64, patch: Value) -> StoreResult<Option<Value>> {
        let response = self
            .client
            .patch(self.table_url(table))
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=representation")
            .json(&patch)
            .send()
            .await?;

        let rows = Self::expect_rows(response).await?;
        Ok(rows.into_iter().next())
    }

    async fn delete(&self, table: &str, id: i64) -> StoreResult<bool> {
        let response = self
            .client
            .delete(self.table_url(table))
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=representation")
            .send()
            .await?;

        let rows = Self::expect_rows(response).await?;
        Ok(!rows.is_empty())
    }

    /// Compare-and-swap decrement
    ///
    /// PostgREST has no arithmetic updates, so the decrement is a conditional
    /// PATCH guarded on the value we just read: `id=eq.{id}&{field}=eq.{seen}`.
    /// An empty result set means a concurrent writer got there first and the
    /// read/patch cycle is retried against the fresh value.
    async fn decrement(
        &self,
        table: &str,
        id: i64,
        field: &str,
        amount: i64,
    ) -> StoreResult<bool> {
        for _ in 0..MAX_CAS_ATTEMPTS {
            let row = self.get(table, &Filter::new().eq("id", id)).await?;
            let Some(row) = row else {
                return Ok(false);
            };

            let current = row.get(field).and_then(Value::as_i64).ok_or_else(|| {
                StoreError::Decode(format!("field {} is not an integer", field))
            })?;

            if current < amount {
                return Ok(false);
            }

            let response = self
                .client
                .patch(self.table_url(table))
                .query(&[
                    ("id", format!("eq.{}", id)),
                    (field, format!("eq.{}", current)),
                ])
                .header("Prefer", "return=representation")
                .json(&json!({ field: current - amount }))
                .send()
                .await?;

            let rows = Self::expect_rows(response).await?;
            if !rows.is_empty() {
                return Ok(true);
            }
        }

        Err(StoreError::Rejected(format!(
            "gave up decrementing {}.{} after {} contended attempts",
            table, field, MAX_CAS_ATTEMPTS
        )))
    }
}

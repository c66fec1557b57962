//! Product Repository

use chrono::Utc;
use serde_json::json;

use super::{BaseRepository, decode, decode_rows};
use crate::db::models::{Product, ProductCreate, ProductUpdate};
use crate::db::store::{Filter, StoreError, StoreHandle, StoreResult};

const PRODUCT_TABLE: &str = "products";

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(store: StoreHandle) -> Self {
        Self {
            base: BaseRepository::new(store),
        }
    }

    /// Find all products in the store's natural order
    pub async fn find_all(&self) -> StoreResult<Vec<Product>> {
        let rows = self
            .base
            .store()
            .list(PRODUCT_TABLE, &Filter::new(), None)
            .await?;
        decode_rows(rows)
    }

    /// Find product by id
    pub async fn find_by_id(&self, id: i64) -> StoreResult<Option<Product>> {
        let row = self
            .base
            .store()
            .get(PRODUCT_TABLE, &Filter::new().eq("id", id))
            .await?;
        row.map(decode).transpose()
    }

    /// Create a new product
    pub async fn create(&self, data: ProductCreate) -> StoreResult<Product> {
        let row = self
            .base
            .store()
            .insert(
                PRODUCT_TABLE,
                json!({
                    "name": data.name,
                    "description": data.description,
                    "price": data.price,
                    "category": data.category,
                    "images": data.images.unwrap_or_default(),
                    "stock_quantity": data.stock_quantity.unwrap_or(0),
                    "is_available": data.is_available.unwrap_or(true),
                    "created_at": Utc::now(),
                }),
            )
            .await?;
        decode(row)
    }

    /// Apply a partial update, stamping `updated_at`
    pub async fn update(&self, id: i64, data: ProductUpdate) -> StoreResult<Option<Product>> {
        // skip_serializing_if drops absent fields, so the patch only carries
        // what the caller actually set
        let mut patch = serde_json::to_value(&data)?;
        let obj = patch
            .as_object_mut()
            .ok_or_else(|| StoreError::Decode("patch is not an object".to_string()))?;
        obj.insert("updated_at".to_string(), serde_json::to_value(Utc::now())?);

        let row = self.base.store().update(PRODUCT_TABLE, id, patch).await?;
        row.map(decode).transpose()
    }

    /// Delete a product
    pub async fn delete(&self, id: i64) -> StoreResult<bool> {
        self.base.store().delete(PRODUCT_TABLE, id).await
    }

    /// Atomically reserve stock: decrement only if enough is available
    pub async fn decrement_stock(&self, id: i64, quantity: i64) -> StoreResult<bool> {
        self.base
            .store()
            .decrement(PRODUCT_TABLE, id, "stock_quantity", quantity)
            .await
    }
}

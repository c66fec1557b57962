//! Catalog Service
//!
//! Product CRUD with boundary validation, plus the public listing filters.

use crate::db::StoreHandle;
use crate::db::models::{Product, ProductCreate, ProductUpdate};
use crate::db::repository::ProductRepository;
use crate::utils::money;
use crate::utils::{AppError, AppResult};

pub struct CatalogService {
    products: ProductRepository,
}

impl CatalogService {
    pub fn new(store: StoreHandle) -> Self {
        Self {
            products: ProductRepository::new(store),
        }
    }

    /// Create a product; price must be strictly positive
    pub async fn create(&self, data: ProductCreate) -> AppResult<Product> {
        if data.name.trim().is_empty() {
            return Err(AppError::validation("Product name is required"));
        }
        money::require_positive_price(data.price)?;
        if let Some(stock) = data.stock_quantity
            && stock < 0
        {
            return Err(AppError::validation("Stock quantity cannot be negative"));
        }

        let product = self.products.create(data).await?;
        tracing::info!(product_id = product.id, name = %product.name, "Product created");
        Ok(product)
    }

    /// Fetch a product by id
    pub async fn get(&self, id: i64) -> AppResult<Product> {
        self.products
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Product not found"))
    }

    /// Apply a partial update; only fields present in the payload change
    pub async fn update(&self, id: i64, data: ProductUpdate) -> AppResult<Product> {
        if let Some(price) = data.price {
            money::require_positive_price(price)?;
        }
        if let Some(stock) = data.stock_quantity
            && stock < 0
        {
            return Err(AppError::validation("Stock quantity cannot be negative"));
        }
        if let Some(name) = &data.name
            && name.trim().is_empty()
        {
            return Err(AppError::validation("Product name cannot be empty"));
        }

        self.products
            .update(id, data)
            .await?
            .ok_or_else(|| AppError::not_found("Product not found"))
    }

    /// Delete a product
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        if !self.products.delete(id).await? {
            return Err(AppError::not_found("Product not found"));
        }
        tracing::info!(product_id = id, "Product deleted");
        Ok(())
    }

    /// Public listing with optional filters
    ///
    /// Category is a case-insensitive exact match; search is a
    /// case-insensitive substring over name or description. Filters apply
    /// before pagination.
    pub async fn list(
        &self,
        category: Option<&str>,
        search: Option<&str>,
        skip: usize,
        limit: usize,
    ) -> AppResult<Vec<Product>> {
        let mut products = self.products.find_all().await?;

        if let Some(category) = category {
            products.retain(|p| {
                p.category
                    .as_deref()
                    .is_some_and(|c| c.eq_ignore_ascii_case(category))
            });
        }

        if let Some(search) = search {
            let needle = search.to_lowercase();
            products.retain(|p| {
                p.name.to_lowercase().contains(&needle)
                    || p.description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
            });
        }

        Ok(products.into_iter().skip(skip).take(limit).collect())
    }

    /// Search over name, description and category
    pub async fn search(&self, query: &str, limit: usize) -> AppResult<Vec<Product>> {
        let needle = query.to_lowercase();
        let mut products = self.products.find_all().await?;
        products.retain(|p| {
            p.name.to_lowercase().contains(&needle)
                || p.description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&needle))
                || p.category
                    .as_deref()
                    .is_some_and(|c| c.to_lowercase().contains(&needle))
        });
        products.truncate(limit);
        Ok(products)
    }

    /// Distinct category names, sorted
    pub async fn categories(&self) -> AppResult<Vec<String>> {
        let products = self.products.find_all().await?;
        let mut categories: Vec<String> = products
            .into_iter()
            .filter_map(|p| p.category)
            .filter(|c| !c.is_empty())
            .collect();
        categories.sort();
        categories.dedup();
        Ok(categories)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::db::{MemoryStore, Store, StoreHandle};

    fn service() -> (CatalogService, StoreHandle) {
        let store: StoreHandle = Arc::new(MemoryStore::new());
        (CatalogService::new(store.clone()), store)
    }

    fn tote(price: f64, stock: i64) -> ProductCreate {
        ProductCreate {
            name: "Tote".to_string(),
            description: Some("Hand-stitched canvas tote".to_string()),
            price,
            category: Some("Bags".to_string()),
            images: None,
            stock_quantity: Some(stock),
            is_available: None,
        }
    }

    #[tokio::test]
    async fn test_create_applies_defaults() {
        let (catalog, _) = service();
        let product = catalog.create(tote(20.0, 2)).await.unwrap();
        assert!(product.is_available);
        assert_eq!(product.stock_quantity, 2);
        assert!(product.updated_at.is_none());
    }

    #[tokio::test]
    async fn test_create_rejects_non_positive_price() {
        let (catalog, store) = service();
        assert!(catalog.create(tote(0.0, 1)).await.is_err());
        assert!(catalog.create(tote(-5.0, 1)).await.is_err());

        // nothing reached storage
        let rows = store
            .list("products", &crate::db::Filter::new(), None)
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_empty_update_changes_nothing() {
        let (catalog, _) = service();
        let product = catalog.create(tote(20.0, 2)).await.unwrap();

        let updated = catalog
            .update(product.id, ProductUpdate::default())
            .await
            .unwrap();
        assert_eq!(updated.name, product.name);
        assert_eq!(updated.price, product.price);
        assert_eq!(updated.stock_quantity, product.stock_quantity);
        assert_eq!(updated.category, product.category);
    }

    #[tokio::test]
    async fn test_negative_price_update_rejected_before_storage() {
        let (catalog, _) = service();
        let product = catalog.create(tote(20.0, 2)).await.unwrap();

        let result = catalog
            .update(
                product.id,
                ProductUpdate {
                    price: Some(-5.0),
                    ..Default::default()
                },
            )
            .await;
        assert!(result.is_err());

        // stored price untouched
        let current = catalog.get(product.id).await.unwrap();
        assert_eq!(current.price, 20.0);
    }

    #[tokio::test]
    async fn test_partial_update_leaves_other_fields() {
        let (catalog, _) = service();
        let product = catalog.create(tote(20.0, 2)).await.unwrap();

        let updated = catalog
            .update(
                product.id,
                ProductUpdate {
                    price: Some(25.5),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.price, 25.5);
        assert_eq!(updated.name, "Tote");
        assert_eq!(updated.stock_quantity, 2);
        assert!(updated.updated_at.is_some());
    }

    #[tokio::test]
    async fn test_list_filters_and_pagination() {
        let (catalog, _) = service();
        catalog.create(tote(20.0, 2)).await.unwrap();
        catalog
            .create(ProductCreate {
                name: "Woven Basket".to_string(),
                description: Some("Seagrass basket".to_string()),
                price: 35.0,
                category: Some("Home".to_string()),
                images: None,
                stock_quantity: Some(4),
                is_available: None,
            })
            .await
            .unwrap();
        catalog
            .create(ProductCreate {
                name: "Canvas Clutch".to_string(),
                description: None,
                price: 15.0,
                category: Some("bags".to_string()),
                images: None,
                stock_quantity: Some(1),
                is_available: None,
            })
            .await
            .unwrap();

        // category match is case-insensitive
        let bags = catalog.list(Some("BAGS"), None, 0, 50).await.unwrap();
        assert_eq!(bags.len(), 2);

        // search matches name or description, case-insensitively
        let canvas = catalog.list(None, Some("canvas"), 0, 50).await.unwrap();
        assert_eq!(canvas.len(), 2);

        // filters apply before pagination
        let page = catalog.list(Some("bags"), None, 1, 1).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].name, "Canvas Clutch");
    }

    #[tokio::test]
    async fn test_categories_are_distinct_and_sorted() {
        let (catalog, _) = service();
        catalog.create(tote(20.0, 1)).await.unwrap();
        catalog.create(tote(22.0, 1)).await.unwrap();
        catalog
            .create(ProductCreate {
                name: "Mug".to_string(),
                description: None,
                price: 12.0,
                category: Some("Ceramics".to_string()),
                images: None,
                stock_quantity: None,
                is_available: None,
            })
            .await
            .unwrap();

        let categories = catalog.categories().await.unwrap();
        assert_eq!(categories, vec!["Bags".to_string(), "Ceramics".to_string()]);
    }
}

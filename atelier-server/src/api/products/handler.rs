//! Product API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentAdmin;
use crate::core::ServerState;
use crate::db::models::{Product, ProductCreate, ProductUpdate};
use crate::services::CatalogService;
use crate::utils::{ApiMessage, AppResult};

fn default_limit() -> usize {
    50
}

fn default_search_limit() -> usize {
    20
}

/// Query parameters for the public product listing
#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    #[serde(default)]
    pub skip: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
    pub category: Option<String>,
    pub search: Option<String>,
}

/// Query parameters for `/search`
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
    #[serde(default = "default_search_limit")]
    pub limit: usize,
}

/// Categories response
#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
}

/// GET /products - 获取商品列表 (支持分类、搜索过滤和分页)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ProductListQuery>,
) -> AppResult<Json<Vec<Product>>> {
    let catalog = CatalogService::new(state.store());
    let products = catalog
        .list(
            query.category.as_deref(),
            query.search.as_deref(),
            query.skip,
            query.limit,
        )
        .await?;
    Ok(Json(products))
}

/// GET /products/:id - 获取单个商品
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Product>> {
    let catalog = CatalogService::new(state.store());
    Ok(Json(catalog.get(id).await?))
}

/// POST /admin/products - 创建商品 (仅管理员)
pub async fn create(
    State(state): State<ServerState>,
    _admin: CurrentAdmin,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<Product>> {
    let catalog = CatalogService::new(state.store());
    Ok(Json(catalog.create(payload).await?))
}

/// PUT /admin/products/:id - 更新商品 (仅管理员)
///
/// PATCH 语义：缺失的字段保持原值
pub async fn update(
    State(state): State<ServerState>,
    _admin: CurrentAdmin,
    Path(id): Path<i64>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<Product>> {
    let catalog = CatalogService::new(state.store());
    Ok(Json(catalog.update(id, payload).await?))
}

/// DELETE /admin/products/:id - 删除商品 (仅管理员)
pub async fn delete(
    State(state): State<ServerState>,
    _admin: CurrentAdmin,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiMessage>> {
    let catalog = CatalogService::new(state.store());
    catalog.delete(id).await?;
    Ok(Json(ApiMessage::ok("Product deleted successfully")))
}

/// GET /categories - 获取分类列表
pub async fn categories(
    State(state): State<ServerState>,
) -> AppResult<Json<CategoriesResponse>> {
    let catalog = CatalogService::new(state.store());
    Ok(Json(CategoriesResponse {
        categories: catalog.categories().await?,
    }))
}

/// GET /search - 按名称、描述、分类搜索商品
pub async fn search(
    State(state): State<ServerState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<Product>>> {
    let catalog = CatalogService::new(state.store());
    Ok(Json(catalog.search(&query.q, query.limit).await?))
}

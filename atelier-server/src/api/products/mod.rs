//! 商品目录 API 模块
//!
//! 公共读取接口在 `/products`、`/categories`、`/search`；
//! 管理接口在 `/admin/products`，需要认证。

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        // Public catalog
        .route("/products", get(handler::list))
        .route("/products/{id}", get(handler::get_by_id))
        .route("/categories", get(handler::categories))
        .route("/search", get(handler::search))
        // Admin catalog management
        .route("/admin/products", post(handler::create))
        .route(
            "/admin/products/{id}",
            put(handler::update).delete(handler::delete),
        )
}

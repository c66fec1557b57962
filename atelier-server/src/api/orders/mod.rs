//! 订单 API 模块
//!
//! 下单是公开接口；查询和状态管理需要管理员认证。

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        // Public order placement
        .route("/orders", post(handler::create))
        // Admin order management
        .route("/admin/orders", get(handler::list))
        .route("/admin/orders/{id}", get(handler::get_by_id))
        .route("/admin/orders/{id}/status", put(handler::update_status))
}

//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentAdmin;
use crate::core::ServerState;
use crate::db::models::{Order, OrderCreate, OrderStatus, OrderStatusUpdate};
use crate::services::OrderService;
use crate::utils::AppResult;

fn default_limit() -> usize {
    50
}

/// Query parameters for the admin order listing
#[derive(Debug, Deserialize)]
pub struct OrderListQuery {
    #[serde(default)]
    pub skip: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
    pub status: Option<OrderStatus>,
}

/// Response for a status update
#[derive(Debug, Serialize)]
pub struct StatusUpdateResponse {
    pub success: bool,
    pub message: String,
    pub order: Order,
}

/// POST /orders - 创建订单 (公开接口)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<Order>> {
    let orders = OrderService::new(state.store());
    Ok(Json(orders.place_order(payload).await?))
}

/// GET /admin/orders - 获取订单列表 (仅管理员)
pub async fn list(
    State(state): State<ServerState>,
    _admin: CurrentAdmin,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = OrderService::new(state.store());
    Ok(Json(
        orders
            .list_orders(query.status, query.skip, query.limit)
            .await?,
    ))
}

/// GET /admin/orders/:id - 获取订单详情 (仅管理员)
pub async fn get_by_id(
    State(state): State<ServerState>,
    _admin: CurrentAdmin,
    Path(id): Path<i64>,
) -> AppResult<Json<Order>> {
    let orders = OrderService::new(state.store());
    Ok(Json(orders.get_order(id).await?))
}

/// PUT /admin/orders/:id/status - 更新订单状态 (仅管理员)
pub async fn update_status(
    State(state): State<ServerState>,
    _admin: CurrentAdmin,
    Path(id): Path<i64>,
    Json(payload): Json<OrderStatusUpdate>,
) -> AppResult<Json<StatusUpdateResponse>> {
    let orders = OrderService::new(state.store());
    let order = orders.update_status(id, payload.status).await?;

    Ok(Json(StatusUpdateResponse {
        success: true,
        message: "Order status updated successfully".to_string(),
        order,
    }))
}

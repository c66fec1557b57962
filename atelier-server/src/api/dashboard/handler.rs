//! Dashboard Statistics Handler
//!
//! Read-only aggregation computed on demand, with no caching and no
//! materialized counters. Revenue counts confirmed, shipped and delivered orders;
//! `processing` is excluded by the storefront's accounting rules.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::auth::CurrentAdmin;
use crate::core::ServerState;
use crate::db::models::{Order, OrderStatus, Product};
use crate::db::repository::{OrderRepository, ProductRepository};
use crate::utils::money;
use crate::utils::AppResult;

/// Stock level below which a product counts as low-stock
const LOW_STOCK_THRESHOLD: i64 = 5;

/// Dashboard statistics
#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub total_products: i64,
    pub total_orders: i64,
    pub pending_orders: i64,
    pub total_revenue: f64,
    pub low_stock_products: i64,
}

/// Aggregate counters over the current catalog and order book
fn compute_stats(products: &[Product], orders: &[Order]) -> DashboardStats {
    let pending_orders = orders
        .iter()
        .filter(|o| o.status == OrderStatus::Pending)
        .count() as i64;

    let total_revenue = orders
        .iter()
        .filter(|o| o.status.counts_toward_revenue())
        .map(|o| money::to_decimal(o.total_amount))
        .sum::<Decimal>();

    let low_stock_products = products
        .iter()
        .filter(|p| p.stock_quantity < LOW_STOCK_THRESHOLD)
        .count() as i64;

    DashboardStats {
        total_products: products.len() as i64,
        total_orders: orders.len() as i64,
        pending_orders,
        total_revenue: money::to_f64(total_revenue),
        low_stock_products,
    }
}

/// GET /admin/dashboard/stats - 仪表盘统计 (仅管理员)
pub async fn stats(
    State(state): State<ServerState>,
    _admin: CurrentAdmin,
) -> AppResult<Json<DashboardStats>> {
    let products = ProductRepository::new(state.store()).find_all().await?;
    let orders = OrderRepository::new(state.store()).find_all(None).await?;

    Ok(Json(compute_stats(&products, &orders)))
}

//! Order Repository

use chrono::Utc;
use serde_json::json;

use super::{BaseRepository, decode, decode_rows};
use crate::db::models::{CustomerInfo, Order, OrderItem, OrderItemInsert, OrderStatus};
use crate::db::store::{Filter, StoreHandle, StoreResult};

const ORDER_TABLE: &str = "orders";
const ORDER_ITEM_TABLE: &str = "order_items";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(store: StoreHandle) -> Self {
        Self {
            base: BaseRepository::new(store),
        }
    }

    /// Persist the order header with status `pending`
    ///
    /// This is the point where the order becomes durable and visible to the
    /// admin listing.
    pub async fn create(
        &self,
        customer_info: &CustomerInfo,
        notes: Option<&str>,
        total_amount: f64,
    ) -> StoreResult<Order> {
        let row = self
            .base
            .store()
            .insert(
                ORDER_TABLE,
                json!({
                    "customer_info": customer_info,
                    "status": OrderStatus::Pending,
                    "total_amount": total_amount,
                    "notes": notes,
                    "created_at": Utc::now(),
                }),
            )
            .await?;
        decode(row)
    }

    /// Find order by id (without items)
    pub async fn find_by_id(&self, id: i64) -> StoreResult<Option<Order>> {
        let row = self
            .base
            .store()
            .get(ORDER_TABLE, &Filter::new().eq("id", id))
            .await?;
        row.map(decode).transpose()
    }

    /// List orders, newest first, optionally restricted to one status
    pub async fn find_all(&self, status: Option<OrderStatus>) -> StoreResult<Vec<Order>> {
        let mut filter = Filter::new();
        if let Some(status) = status {
            filter = filter.eq("status", status.as_str());
        }
        let rows = self
            .base
            .store()
            .list(ORDER_TABLE, &filter, Some("created_at.desc"))
            .await?;
        decode_rows(rows)
    }

    /// Overwrite the order status, stamping `updated_at`
    pub async fn update_status(
        &self,
        id: i64,
        status: OrderStatus,
    ) -> StoreResult<Option<Order>> {
        let row = self
            .base
            .store()
            .update(
                ORDER_TABLE,
                id,
                json!({ "status": status, "updated_at": Utc::now() }),
            )
            .await?;
        row.map(decode).transpose()
    }

    /// Persist the priced line items for an order
    pub async fn insert_items(
        &self,
        order_id: i64,
        lines: &[OrderItemInsert],
    ) -> StoreResult<Vec<OrderItem>> {
        let mut items = Vec::with_capacity(lines.len());
        for line in lines {
            let row = self
                .base
                .store()
                .insert(
                    ORDER_ITEM_TABLE,
                    json!({
                        "order_id": order_id,
                        "product_id": line.product_id,
                        "quantity": line.quantity,
                        "price_per_unit": line.price_per_unit,
                        "total_price": line.total_price,
                    }),
                )
                .await?;
            items.push(decode(row)?);
        }
        Ok(items)
    }

    /// Fetch the line items belonging to an order
    pub async fn items_for(&self, order_id: i64) -> StoreResult<Vec<OrderItem>> {
        let rows = self
            .base
            .store()
            .list(
                ORDER_ITEM_TABLE,
                &Filter::new().eq("order_id", order_id),
                None,
            )
            .await?;
        decode_rows(rows)
    }
}

//! Order Service
//!
//! The order placement flow: availability check, price snapshot, header and
//! line-item persistence, stock reservation. Each step is an independent
//! store call; when a later step fails, earlier writes are not compensated
//! and the error propagates as-is.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::db::models::{Order, OrderCreate, OrderItemInsert, OrderStatus};
use crate::db::repository::{OrderRepository, ProductRepository};
use crate::db::{StoreError, StoreHandle};
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_email,
    validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult, money};

/// Pluggable status transition rules
///
/// The default policy permits every transition, which keeps manual admin
/// overrides possible. A stricter state machine can be substituted without
/// touching any caller.
pub trait TransitionPolicy: Send + Sync {
    fn allows(&self, from: OrderStatus, to: OrderStatus) -> bool;
}

/// Permits every status transition
pub struct AllowAny;

impl TransitionPolicy for AllowAny {
    fn allows(&self, _from: OrderStatus, _to: OrderStatus) -> bool {
        true
    }
}

/// Validate a place-order payload before touching the store
fn validate_order_request(request: &OrderCreate) -> Result<(), AppError> {
    let customer = &request.customer_info;
    validate_required_text(&customer.name, "customer name", MAX_NAME_LEN)?;
    validate_email(&customer.email)?;
    validate_required_text(&customer.phone, "customer phone", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&customer.address, "customer address", MAX_ADDRESS_LEN)?;
    validate_optional_text(&customer.city, "city", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&customer.postal_code, "postal code", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&request.notes, "notes", MAX_NOTE_LEN)?;

    if request.items.is_empty() {
        return Err(AppError::validation("Order must contain at least one item"));
    }
    for item in &request.items {
        if item.quantity <= 0 {
            return Err(AppError::validation("Quantity must be positive"));
        }
    }

    Ok(())
}

pub struct OrderService {
    products: ProductRepository,
    orders: OrderRepository,
    policy: Arc<dyn TransitionPolicy>,
}

impl OrderService {
    pub fn new(store: StoreHandle) -> Self {
        Self::with_policy(store, Arc::new(AllowAny))
    }

    pub fn with_policy(store: StoreHandle, policy: Arc<dyn TransitionPolicy>) -> Self {
        Self {
            products: ProductRepository::new(store.clone()),
            orders: OrderRepository::new(store),
            policy,
        }
    }

    /// Place an order
    ///
    /// 1. Validate every requested item against the catalog; a missing
    ///    product or an out-of-stock line aborts the whole request before
    ///    anything is written.
    /// 2. Snapshot `price_per_unit` and compute line totals with decimal
    ///    precision.
    /// 3. Persist the order header (status `pending`), then its line items.
    /// 4. Reserve stock per item through the conditional decrement; a
    ///    refusal there is the authoritative out-of-stock signal and aborts
    ///    the remaining sequence.
    pub async fn place_order(&self, request: OrderCreate) -> AppResult<Order> {
        validate_order_request(&request)?;

        // Stage 1: availability check + price snapshot
        let mut total = Decimal::ZERO;
        let mut lines = Vec::with_capacity(request.items.len());
        let mut product_names = Vec::with_capacity(request.items.len());

        for item in &request.items {
            let product = self
                .products
                .find_by_id(item.product_id)
                .await?
                .ok_or_else(|| {
                    AppError::not_found(format!("Product {} not found", item.product_id))
                })?;

            if product.stock_quantity < item.quantity {
                return Err(AppError::insufficient_stock(product.name));
            }

            let line_total = money::line_total(product.price, item.quantity);
            total += line_total;

            lines.push(OrderItemInsert {
                product_id: item.product_id,
                quantity: item.quantity,
                price_per_unit: product.price,
                total_price: money::to_f64(line_total),
            });
            product_names.push(product.name);
        }

        // Stage 2: persist header, then line items
        let mut order = self
            .orders
            .create(
                &request.customer_info,
                request.notes.as_deref(),
                money::to_f64(total),
            )
            .await?;
        let items = self.orders.insert_items(order.id, &lines).await?;

        // Stage 3: stock reservation. Earlier decrements stay applied when a
        // later one is refused.
        for (line, name) in lines.iter().zip(&product_names) {
            let reserved = self
                .products
                .decrement_stock(line.product_id, line.quantity)
                .await?;
            if !reserved {
                tracing::warn!(
                    order_id = order.id,
                    product_id = line.product_id,
                    "Stock reservation refused after order insert"
                );
                return Err(AppError::insufficient_stock(name.clone()));
            }
        }

        order.items = items;
        tracing::info!(
            order_id = order.id,
            total_amount = order.total_amount,
            "Order placed"
        );
        Ok(order)
    }

    /// Overwrite the order status, subject to the transition policy
    pub async fn update_status(&self, order_id: i64, new_status: OrderStatus) -> AppResult<Order> {
        let existing = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| AppError::not_found("Order not found"))?;

        if !self.policy.allows(existing.status, new_status) {
            return Err(AppError::validation(format!(
                "Status transition {} -> {} is not allowed",
                existing.status, new_status
            )));
        }

        let order = self
            .orders
            .update_status(order_id, new_status)
            .await?
            .ok_or_else(|| AppError::not_found("Order not found"))?;

        tracing::info!(order_id, status = %new_status, "Order status updated");
        Ok(order)
    }

    /// Fetch an order with its line items attached
    pub async fn get_order(&self, order_id: i64) -> AppResult<Order> {
        let mut order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| AppError::not_found("Order not found"))?;
        order.items = self.orders.items_for(order_id).await?;
        Ok(order)
    }

    /// List orders (newest first), items attached per order
    pub async fn list_orders(
        &self,
        status: Option<OrderStatus>,
        skip: usize,
        limit: usize,
    ) -> AppResult<Vec<Order>> {
        let orders = self.orders.find_all(status).await?;
        let page: Vec<Order> = orders.into_iter().skip(skip).take(limit).collect();

        // one item fetch per order
        let with_items = futures::future::try_join_all(page.into_iter().map(|mut order| {
            let repo = self.orders.clone();
            async move {
                order.items = repo.items_for(order.id).await?;
                Ok::<_, StoreError>(order)
            }
        }))
        .await?;

        Ok(with_items)
    }
}

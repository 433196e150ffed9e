//! Order Lifecycle Service
//!
//! Owns order headers and their line items. Creation validates stock for
//! every requested line before the first write, snapshots unit prices,
//! and deducts stock; cancellation restores it. Status transitions are
//! gated: only PLACED orders can be cancelled or completed.
//!
//! The header insert, item inserts and stock writes are independent
//! round-trips with no transactional envelope; a failure partway
//! leaves whatever the completed prefix produced.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde_json::json;

use shared::models::{Order, OrderItem, OrderItemRequest, OrderStatus};
use tally_store::{from_row, to_row, Filter, RowStore};

use crate::error::{AppError, AppResult};
use crate::services::{expect_row, find_one, CatalogService};

const ORDERS: &str = "orders";
const ORDER_ITEMS: &str = "order_items";
const PRODUCTS: &str = "products";

/// Order lifecycle operations
#[derive(Clone)]
pub struct OrderService {
    store: Arc<dyn RowStore>,
    catalog: CatalogService,
}

impl OrderService {
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        let catalog = CatalogService::new(store.clone());
        Self { store, catalog }
    }

    // ========== Create ==========

    /// Place a new order.
    ///
    /// Every line is validated against current stock before any write;
    /// the products read during validation are reused for the deduction,
    /// so each product is fetched once per call.
    pub async fn create(&self, cust_id: i64, items: &[OrderItemRequest]) -> AppResult<Order> {
        let mut lines = Vec::with_capacity(items.len());
        for item in items {
            let product = self.catalog.get_by_id(item.prod_id).await?;
            if product.stock < item.quantity {
                return Err(AppError::InsufficientStock(product.name));
            }
            lines.push((product, item.quantity));
        }

        let total: f64 = lines
            .iter()
            .map(|(product, quantity)| product.price * *quantity as f64)
            .sum();

        // deduct stock, one read-modify-write per product
        for (product, quantity) in &lines {
            self.store
                .update(
                    PRODUCTS,
                    &[Filter::eq("prod_id", product.prod_id)],
                    to_row(&json!({ "stock": product.stock - quantity }))?,
                )
                .await?;
        }

        let header = expect_row(
            self.store
                .insert(
                    ORDERS,
                    to_row(&json!({
                        "cust_id": cust_id,
                        "status": OrderStatus::Placed,
                        "total_amount": total,
                        "order_date": Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
                    }))?,
                )
                .await?,
        )?;
        let order_id = header
            .get("order_id")
            .and_then(serde_json::Value::as_i64)
            .ok_or_else(|| AppError::not_found("Order", "<unassigned>"))?;

        // one line item per request, price snapshotted from the read above
        for (product, quantity) in &lines {
            self.store
                .insert(
                    ORDER_ITEMS,
                    to_row(&json!({
                        "order_id": order_id,
                        "prod_id": product.prod_id,
                        "quantity": quantity,
                        "price": product.price,
                    }))?,
                )
                .await?;
        }

        tracing::info!(order_id, cust_id, total, "order placed");
        self.get_details(order_id).await
    }

    // ========== Read ==========

    /// Fetch an order header along with its line items
    pub async fn get_details(&self, order_id: i64) -> AppResult<Order> {
        let header = find_one(&*self.store, ORDERS, &[Filter::eq("order_id", order_id)])
            .await?
            .ok_or_else(|| AppError::not_found("Order", order_id))?;
        let mut order: Order = from_row(header)?;

        let item_rows = self
            .store
            .select(ORDER_ITEMS, &[Filter::eq("order_id", order_id)], None, None)
            .await?;
        order.items = item_rows
            .into_iter()
            .map(|row| from_row::<OrderItem>(row).map_err(AppError::from))
            .collect::<AppResult<_>>()?;

        Ok(order)
    }

    /// All orders for a customer, any status
    pub async fn list(&self, cust_id: i64) -> AppResult<Vec<Order>> {
        let rows = self
            .store
            .select(ORDERS, &[Filter::eq("cust_id", cust_id)], None, None)
            .await?;
        rows.into_iter()
            .map(|row| from_row(row).map_err(AppError::from))
            .collect()
    }

    // ========== Transitions ==========

    /// Cancel a PLACED order, restoring stock for every line item
    pub async fn cancel(&self, order_id: i64) -> AppResult<Order> {
        let order = self.get_details(order_id).await?;
        if order.status != OrderStatus::Placed {
            return Err(AppError::invalid_transition("order", "cancel", order.status));
        }

        for item in &order.items {
            let product = self.catalog.get_by_id(item.prod_id).await?;
            self.store
                .update(
                    PRODUCTS,
                    &[Filter::eq("prod_id", item.prod_id)],
                    to_row(&json!({ "stock": product.stock + item.quantity }))?,
                )
                .await?;
        }

        tracing::info!(order_id, "order cancelled");
        self.set_status(order_id, OrderStatus::Cancelled).await
    }

    /// Complete a PLACED order. Stock was already deducted at creation,
    /// so there is no stock side effect.
    pub async fn complete(&self, order_id: i64) -> AppResult<Order> {
        let order = self.get_details(order_id).await?;
        if order.status != OrderStatus::Placed {
            return Err(AppError::invalid_transition(
                "order",
                "complete",
                order.status,
            ));
        }

        tracing::info!(order_id, "order completed");
        self.set_status(order_id, OrderStatus::Completed).await
    }

    async fn set_status(&self, order_id: i64, status: OrderStatus) -> AppResult<Order> {
        self.store
            .update(
                ORDERS,
                &[Filter::eq("order_id", order_id)],
                to_row(&json!({ "status": status }))?,
            )
            .await?;
        self.get_details(order_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::ProductCreate;
    use tally_store::MemoryStore;

    struct Fixture {
        orders: OrderService,
        catalog: CatalogService,
    }

    async fn fixture() -> Fixture {
        let store: Arc<dyn RowStore> = Arc::new(MemoryStore::new());
        let orders = OrderService::new(store.clone());
        let catalog = CatalogService::new(store);
        Fixture { orders, catalog }
    }

    async fn seed_product(f: &Fixture, sku: &str, price: f64, stock: i64) -> i64 {
        f.catalog
            .add(ProductCreate {
                name: format!("Product {sku}"),
                sku: sku.into(),
                price,
                stock: Some(stock),
                category: None,
            })
            .await
            .unwrap()
            .prod_id
    }

    fn line(prod_id: i64, quantity: i64) -> OrderItemRequest {
        OrderItemRequest { prod_id, quantity }
    }

    #[tokio::test]
    async fn create_computes_total_and_deducts_stock() {
        let f = fixture().await;
        let mug = seed_product(&f, "MUG-1", 10.0, 5).await;
        let pen = seed_product(&f, "PEN-1", 2.5, 8).await;

        let order = f.orders.create(1, &[line(mug, 2), line(pen, 4)]).await.unwrap();

        assert_eq!(order.status, OrderStatus::Placed);
        assert_eq!(order.total_amount, 2.0 * 10.0 + 4.0 * 2.5);
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[0].price, 10.0);

        assert_eq!(f.catalog.get_by_id(mug).await.unwrap().stock, 3);
        assert_eq!(f.catalog.get_by_id(pen).await.unwrap().stock, 4);
    }

    #[tokio::test]
    async fn create_snapshots_price_at_order_time() {
        let f = fixture().await;
        let mug = seed_product(&f, "MUG-1", 10.0, 5).await;

        let order = f.orders.create(1, &[line(mug, 1)]).await.unwrap();

        // raising the price later must not touch the recorded line
        f.catalog
            .update(
                mug,
                shared::models::ProductUpdate {
                    price: Some(99.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let details = f.orders.get_details(order.order_id).await.unwrap();
        assert_eq!(details.items[0].price, 10.0);
    }

    #[tokio::test]
    async fn insufficient_stock_fails_without_any_deduction() {
        let f = fixture().await;
        let mug = seed_product(&f, "MUG-1", 10.0, 5).await;
        let pen = seed_product(&f, "PEN-1", 2.5, 1).await;

        let err = f
            .orders
            .create(1, &[line(mug, 2), line(pen, 3)])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InsufficientStock(name) if name == "Product PEN-1"));

        // validation precedes every write, so nothing moved
        assert_eq!(f.catalog.get_by_id(mug).await.unwrap().stock, 5);
        assert_eq!(f.catalog.get_by_id(pen).await.unwrap().stock, 1);
    }

    #[tokio::test]
    async fn create_with_unknown_product_propagates_not_found() {
        let f = fixture().await;

        let err = f.orders.create(1, &[line(77, 1)]).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { kind: "Product", .. }));
    }

    #[tokio::test]
    async fn cancel_restores_stock_and_is_terminal() {
        let f = fixture().await;
        let mug = seed_product(&f, "MUG-1", 10.0, 5).await;
        let order = f.orders.create(1, &[line(mug, 3)]).await.unwrap();
        assert_eq!(f.catalog.get_by_id(mug).await.unwrap().stock, 2);

        let cancelled = f.orders.cancel(order.order_id).await.unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);
        assert_eq!(f.catalog.get_by_id(mug).await.unwrap().stock, 5);

        // no transition out of CANCELLED, and stock stays put
        let err = f.orders.cancel(order.order_id).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition { .. }));
        assert_eq!(f.catalog.get_by_id(mug).await.unwrap().stock, 5);

        let err = f.orders.complete(order.order_id).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn complete_has_no_stock_side_effect() {
        let f = fixture().await;
        let mug = seed_product(&f, "MUG-1", 10.0, 5).await;
        let order = f.orders.create(1, &[line(mug, 2)]).await.unwrap();

        let completed = f.orders.complete(order.order_id).await.unwrap();
        assert_eq!(completed.status, OrderStatus::Completed);
        assert_eq!(f.catalog.get_by_id(mug).await.unwrap().stock, 3);

        let err = f.orders.complete(order.order_id).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn list_returns_all_orders_for_a_customer() {
        let f = fixture().await;
        let mug = seed_product(&f, "MUG-1", 10.0, 10).await;

        f.orders.create(1, &[line(mug, 1)]).await.unwrap();
        f.orders.create(1, &[line(mug, 2)]).await.unwrap();
        f.orders.create(2, &[line(mug, 3)]).await.unwrap();

        assert_eq!(f.orders.list(1).await.unwrap().len(), 2);
        assert_eq!(f.orders.list(2).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn get_details_of_unknown_order_is_not_found() {
        let f = fixture().await;

        let err = f.orders.get_details(404).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { kind: "Order", .. }));
    }
}

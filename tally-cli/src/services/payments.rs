//! Payment Lifecycle Service
//!
//! One payment row per order, keyed by order id. Transitions are gated
//! (PENDING -> PAID -> REFUNDED); a successful process drives the order
//! to COMPLETED as a side effect.
//!
//! Creation is deliberately permissive: it neither verifies the order
//! exists nor that the amount matches the order total. Processing is
//! not atomic either; the payment row is already PAID when order
//! completion runs, so a completion failure propagates with the
//! payment kept PAID.

use std::sync::Arc;

use serde_json::json;

use shared::models::{Payment, PaymentStatus};
use tally_store::{from_row, to_row, Filter, RowStore};

use crate::error::{AppError, AppResult};
use crate::services::{expect_row, find_one, OrderService};

const TABLE: &str = "payments";

/// Payment lifecycle operations
#[derive(Clone)]
pub struct PaymentService {
    store: Arc<dyn RowStore>,
    orders: OrderService,
}

impl PaymentService {
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        let orders = OrderService::new(store.clone());
        Self { store, orders }
    }

    // ========== Create ==========

    /// Insert a PENDING payment for an order
    pub async fn create(&self, order_id: i64, amount: f64) -> AppResult<Payment> {
        if amount <= 0.0 {
            return Err(AppError::InvalidAmount);
        }

        let inserted = self
            .store
            .insert(
                TABLE,
                to_row(&json!({
                    "order_id": order_id,
                    "amount": amount,
                    "status": PaymentStatus::Pending,
                    "method": null,
                }))?,
            )
            .await?;
        let payment: Payment = from_row(expect_row(inserted)?)?;

        tracing::info!(order_id, amount, "payment created");
        Ok(payment)
    }

    // ========== Read ==========

    pub async fn get(&self, order_id: i64) -> AppResult<Payment> {
        let row = find_one(&*self.store, TABLE, &[Filter::eq("order_id", order_id)])
            .await?
            .ok_or_else(|| AppError::not_found("Payment", order_id))?;
        Ok(from_row(row)?)
    }

    // ========== Transitions ==========

    /// Mark a PENDING payment PAID and complete the order.
    ///
    /// If the order is not in PLACED status the completion failure
    /// propagates after the payment row is already PAID.
    pub async fn process(&self, order_id: i64, method: &str) -> AppResult<Payment> {
        let payment = self.get(order_id).await?;
        if payment.status != PaymentStatus::Pending {
            return Err(AppError::invalid_transition(
                "payment",
                "process",
                payment.status,
            ));
        }

        let updated = self
            .store
            .update(
                TABLE,
                &[Filter::eq("order_id", order_id)],
                to_row(&json!({ "status": PaymentStatus::Paid, "method": method }))?,
            )
            .await?;
        let payment: Payment = from_row(expect_row(updated)?)?;

        // payment success drives order completion
        self.orders.complete(order_id).await?;

        tracing::info!(order_id, method, "payment processed");
        Ok(payment)
    }

    /// Refund a PAID payment. Order status and stock are untouched.
    pub async fn refund(&self, order_id: i64) -> AppResult<Payment> {
        let payment = self.get(order_id).await?;
        if payment.status != PaymentStatus::Paid {
            return Err(AppError::invalid_transition(
                "payment",
                "refund",
                payment.status,
            ));
        }

        let updated = self
            .store
            .update(
                TABLE,
                &[Filter::eq("order_id", order_id)],
                to_row(&json!({ "status": PaymentStatus::Refunded }))?,
            )
            .await?;
        let payment: Payment = from_row(expect_row(updated)?)?;

        tracing::info!(order_id, "payment refunded");
        Ok(payment)
    }

    // ========== Delete ==========

    /// Administrative escape hatch: drop the payment row for an order,
    /// returning the removed record. Not part of the normal lifecycle.
    pub async fn remove(&self, order_id: i64) -> AppResult<Payment> {
        let payment = self.get(order_id).await?;
        self.store
            .delete(TABLE, &[Filter::eq("order_id", order_id)])
            .await?;

        tracing::warn!(order_id, "payment removed");
        Ok(payment)
    }
}

//! # Order Repository
//!
//! ## Order Creation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BEGIN                                                                  │
//! │    INSERT orders        (totals already computed by resort-core)        │
//! │    INSERT order_items × n   (snapshots, position keeps line order)      │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Any failure rolls back the whole order. No half-written orders.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Status Changes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BEGIN                                                                  │
//! │    UPDATE orders SET status = to         WHERE id = ? AND status = from │
//! │    UPDATE orders SET payment_status = to WHERE id = ? AND ... = from    │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  0 rows on either write: rollback, then NotFound (no such order) or     │
//! │  Conflict (someone else moved it first).                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Status rules live in `resort_core::order`; this module only persists the
//! outcome, and only if the row still holds the status the rules were
//! checked against.

use chrono::{DateTime, Utc};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use resort_core::{Currency, Money, Order, OrderItem, OrderStatus, PaymentStatus};

/// A status write guarded by the value the caller last saw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition<T> {
    pub from: T,
    pub to: T,
}

impl<T: PartialEq> Transition<T> {
    pub fn new(from: T, to: T) -> Self {
        Transition { from, to }
    }

    pub fn is_noop(&self) -> bool {
        self.from == self.to
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: String,
    table_label: Option<String>,
    customer_name: Option<String>,
    notes: Option<String>,
    status: OrderStatus,
    payment_status: PaymentStatus,
    currency: String,
    subtotal: i64,
    tax: i64,
    tip: i64,
    total: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    id: String,
    order_id: String,
    menu_item_id: String,
    name_snapshot: String,
    variant_label: Option<String>,
    unit_price: i64,
    quantity: i64,
    line_total: i64,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        OrderItem {
            id: row.id,
            order_id: row.order_id,
            menu_item_id: row.menu_item_id,
            name_snapshot: row.name_snapshot,
            variant_label: row.variant_label,
            unit_price: Money::from_minor(row.unit_price),
            quantity: row.quantity,
            line_total: Money::from_minor(row.line_total),
        }
    }
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>) -> DbResult<Order> {
        let currency: Currency = self.currency.parse().map_err(|_| DbError::InvalidValue {
            column: "orders.currency",
            value: self.currency.clone(),
        })?;

        Ok(Order {
            id: self.id,
            table_label: self.table_label,
            customer_name: self.customer_name,
            notes: self.notes,
            status: self.status,
            payment_status: self.payment_status,
            currency,
            subtotal: Money::from_minor(self.subtotal),
            tax: Money::from_minor(self.tax),
            tip: Money::from_minor(self.tip),
            total: Money::from_minor(self.total),
            items,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Repository for orders and their lines.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Stores an order and all of its lines atomically.
    pub async fn create(&self, order: &Order) -> DbResult<()> {
        debug!(id = %order.id, lines = order.items.len(), "Creating order");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO orders (
                id, table_label, customer_name, notes, status, payment_status,
                currency, subtotal, tax, tip, total, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
        )
        .bind(&order.id)
        .bind(&order.table_label)
        .bind(&order.customer_name)
        .bind(&order.notes)
        .bind(order.status)
        .bind(order.payment_status)
        .bind(order.currency.code())
        .bind(order.subtotal.minor())
        .bind(order.tax.minor())
        .bind(order.tip.minor())
        .bind(order.total.minor())
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&mut *tx)
        .await?;

        for (position, item) in order.items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO order_items (
                    id, order_id, menu_item_id, name_snapshot, variant_label,
                    unit_price, quantity, line_total, position
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                "#,
            )
            .bind(&item.id)
            .bind(&order.id)
            .bind(&item.menu_item_id)
            .bind(&item.name_snapshot)
            .bind(&item.variant_label)
            .bind(item.unit_price.minor())
            .bind(item.quantity)
            .bind(item.line_total.minor())
            .bind(position as i64)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(id = %order.id, total = order.total.minor(), "Order created");
        Ok(())
    }

    async fn items_for(&self, order_id: &str) -> DbResult<Vec<OrderItem>> {
        let rows = sqlx::query_as::<_, OrderItemRow>(
            r#"
            SELECT id, order_id, menu_item_id, name_snapshot, variant_label,
                   unit_price, quantity, line_total
            FROM order_items
            WHERE order_id = ?1
            ORDER BY position
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(OrderItem::from).collect())
    }

    /// Gets an order with its lines.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT id, table_label, customer_name, notes, status, payment_status,
                   currency, subtotal, tax, tip, total, created_at, updated_at
            FROM orders
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let items = self.items_for(&row.id).await?;
                Ok(Some(row.into_order(items)?))
            }
            None => Ok(None),
        }
    }

    /// Most recent orders first, with their lines.
    pub async fn list_recent(&self, limit: i64) -> DbResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT id, table_label, customer_name, notes, status, payment_status,
                   currency, subtotal, tax, tip, total, created_at, updated_at
            FROM orders
            ORDER BY created_at DESC, id
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            let items = self.items_for(&row.id).await?;
            orders.push(row.into_order(items)?);
        }
        Ok(orders)
    }

    /// Applies status changes already checked by the caller, atomically.
    ///
    /// Each write only lands if the column still holds `from`. When either
    /// guard fails nothing is written: the result is [`DbError::NotFound`]
    /// for an unknown id and [`DbError::Conflict`] when another request
    /// changed the order first.
    pub async fn change_status(
        &self,
        id: &str,
        status: Option<Transition<OrderStatus>>,
        payment_status: Option<Transition<PaymentStatus>>,
    ) -> DbResult<()> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        if let Some(change) = status {
            let result = sqlx::query(
                "UPDATE orders SET status = ?3, updated_at = ?4 WHERE id = ?1 AND status = ?2",
            )
            .bind(id)
            .bind(change.from)
            .bind(change.to)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                return Err(Self::guard_failure(&mut tx, id).await);
            }
        }

        if let Some(change) = payment_status {
            let result = sqlx::query(
                "UPDATE orders SET payment_status = ?3, updated_at = ?4 \
                 WHERE id = ?1 AND payment_status = ?2",
            )
            .bind(id)
            .bind(change.from)
            .bind(change.to)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                return Err(Self::guard_failure(&mut tx, id).await);
            }
        }

        tx.commit().await?;

        debug!(
            id = %id,
            status = ?status.map(|c| c.to),
            payment_status = ?payment_status.map(|c| c.to),
            "Order status updated"
        );
        Ok(())
    }

    /// Tells a missing order apart from one whose status moved underneath us.
    async fn guard_failure(tx: &mut Transaction<'_, Sqlite>, id: &str) -> DbError {
        let exists = sqlx::query_scalar::<_, i64>("SELECT 1 FROM orders WHERE id = ?1")
            .bind(id)
            .fetch_optional(&mut **tx)
            .await;

        match exists {
            Ok(Some(_)) => {
                warn!(id = %id, "Stale status change rejected");
                DbError::conflict("Order", id)
            }
            Ok(None) => DbError::not_found("Order", id),
            Err(err) => err.into(),
        }
    }

    /// Deletes an order; its lines go with it (ON DELETE CASCADE).
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM orders WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", id));
        }

        Ok(())
    }
}

//! Order data access
//!
//! Reads go straight through [`OrderStore`]. Writes happen inside an
//! [`OrderTx`] obtained from [`OrderStore::begin`]: `commit` consumes the
//! transaction, dropping it uncommitted rolls everything back.

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};

use super::models::{OrderDetailRecord, OrderLine, OrderRecord};
use crate::catalog::Flower;

// ============================================================================
// Query Filters
// ============================================================================

/// Typed order listing filter, always scoped to one user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderFilter {
    All,
    Day { day: i32, month: i32, year: i32 },
    Month { month: i32, year: i32 },
    MonthRange { first_month: i32, last_month: i32, year: i32 },
    Year { year: i32 },
}

impl OrderFilter {
    pub fn matches(&self, order: &OrderRecord) -> bool {
        match *self {
            OrderFilter::All => true,
            OrderFilter::Day { day, month, year } => {
                order.day == day && order.month == month && order.year == year
            }
            OrderFilter::Month { month, year } => order.month == month && order.year == year,
            OrderFilter::MonthRange {
                first_month,
                last_month,
                year,
            } => (first_month..=last_month).contains(&order.month) && order.year == year,
            OrderFilter::Year { year } => order.year == year,
        }
    }
}

// ============================================================================
// Store Traits
// ============================================================================

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Open a write transaction
    async fn begin(&self) -> Result<Box<dyn OrderTx>, sqlx::Error>;

    /// Orders of one user matching the filter, ascending id
    async fn find_orders(
        &self,
        user_id: i64,
        filter: OrderFilter,
    ) -> Result<Vec<OrderRecord>, sqlx::Error>;

    /// A single order, only if it belongs to the user
    async fn find_order(
        &self,
        user_id: i64,
        order_id: i64,
    ) -> Result<Option<OrderRecord>, sqlx::Error>;

    /// Line items of the given orders, ascending id
    async fn find_details(&self, order_ids: &[i64]) -> Result<Vec<OrderDetailRecord>, sqlx::Error>;

    /// Running spending total, `None` before the first order
    async fn find_spending(&self, user_id: i64) -> Result<Option<Decimal>, sqlx::Error>;
}

#[async_trait]
pub trait OrderTx: Send {
    /// Read a flower and hold it for the rest of the transaction
    async fn lock_flower(&mut self, flower_id: i64) -> Result<Option<Flower>, sqlx::Error>;

    async fn decrement_stock(&mut self, flower_id: i64, quantity: i32) -> Result<(), sqlx::Error>;

    async fn insert_order(
        &mut self,
        user_id: i64,
        date: NaiveDate,
        total_cost: Decimal,
    ) -> Result<OrderRecord, sqlx::Error>;

    async fn insert_detail(
        &mut self,
        order_id: i64,
        line: &OrderLine,
    ) -> Result<OrderDetailRecord, sqlx::Error>;

    /// Create or increment the user's spending row, returning the new total
    async fn add_spending(&mut self, user_id: i64, amount: Decimal) -> Result<Decimal, sqlx::Error>;

    async fn commit(self: Box<Self>) -> Result<(), sqlx::Error>;
}

// ============================================================================
// PostgreSQL Implementation
// ============================================================================

const ORDER_COLUMNS: &str = "id, user_id, day, month, year, total_cost";

pub struct PgOrderStore {
    pool: PgPool,
}

impl PgOrderStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderStore for PgOrderStore {
    async fn begin(&self) -> Result<Box<dyn OrderTx>, sqlx::Error> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgOrderTx { tx }))
    }

    async fn find_orders(
        &self,
        user_id: i64,
        filter: OrderFilter,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        match filter {
            OrderFilter::All => {
                let sql = format!(
                    "SELECT {} FROM orders WHERE user_id = $1 ORDER BY id",
                    ORDER_COLUMNS
                );
                sqlx::query_as(&sql)
                    .bind(user_id)
                    .fetch_all(&self.pool)
                    .await
            }
            OrderFilter::Day { day, month, year } => {
                let sql = format!(
                    "SELECT {} FROM orders
                     WHERE user_id = $1 AND day = $2 AND month = $3 AND year = $4
                     ORDER BY id",
                    ORDER_COLUMNS
                );
                sqlx::query_as(&sql)
                    .bind(user_id)
                    .bind(day)
                    .bind(month)
                    .bind(year)
                    .fetch_all(&self.pool)
                    .await
            }
            OrderFilter::Month { month, year } => {
                let sql = format!(
                    "SELECT {} FROM orders
                     WHERE user_id = $1 AND month = $2 AND year = $3
                     ORDER BY id",
                    ORDER_COLUMNS
                );
                sqlx::query_as(&sql)
                    .bind(user_id)
                    .bind(month)
                    .bind(year)
                    .fetch_all(&self.pool)
                    .await
            }
            OrderFilter::MonthRange {
                first_month,
                last_month,
                year,
            } => {
                let sql = format!(
                    "SELECT {} FROM orders
                     WHERE user_id = $1 AND month >= $2 AND month <= $3 AND year = $4
                     ORDER BY id",
                    ORDER_COLUMNS
                );
                sqlx::query_as(&sql)
                    .bind(user_id)
                    .bind(first_month)
                    .bind(last_month)
                    .bind(year)
                    .fetch_all(&self.pool)
                    .await
            }
            OrderFilter::Year { year } => {
                let sql = format!(
                    "SELECT {} FROM orders WHERE user_id = $1 AND year = $2 ORDER BY id",
                    ORDER_COLUMNS
                );
                sqlx::query_as(&sql)
                    .bind(user_id)
                    .bind(year)
                    .fetch_all(&self.pool)
                    .await
            }
        }
    }

    async fn find_order(
        &self,
        user_id: i64,
        order_id: i64,
    ) -> Result<Option<OrderRecord>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM orders WHERE user_id = $1 AND id = $2",
            ORDER_COLUMNS
        );
        sqlx::query_as(&sql)
            .bind(user_id)
            .bind(order_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn find_details(&self, order_ids: &[i64]) -> Result<Vec<OrderDetailRecord>, sqlx::Error> {
        if order_ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as(
            "SELECT id, order_id, flower_id, quantity, total_price
             FROM order_details WHERE order_id = ANY($1) ORDER BY id",
        )
        .bind(order_ids.to_vec())
        .fetch_all(&self.pool)
        .await
    }

    async fn find_spending(&self, user_id: i64) -> Result<Option<Decimal>, sqlx::Error> {
        sqlx::query_scalar("SELECT total_spending FROM customer_spending WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
    }
}

pub struct PgOrderTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl OrderTx for PgOrderTx {
    async fn lock_flower(&mut self, flower_id: i64) -> Result<Option<Flower>, sqlx::Error> {
        sqlx::query_as("SELECT id, name, price, quantity FROM flowers WHERE id = $1 FOR UPDATE")
            .bind(flower_id)
            .fetch_optional(&mut *self.tx)
            .await
    }

    async fn decrement_stock(&mut self, flower_id: i64, quantity: i32) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE flowers SET quantity = quantity - $1 WHERE id = $2")
            .bind(quantity)
            .bind(flower_id)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn insert_order(
        &mut self,
        user_id: i64,
        date: NaiveDate,
        total_cost: Decimal,
    ) -> Result<OrderRecord, sqlx::Error> {
        let sql = format!(
            "INSERT INTO orders (user_id, day, month, year, total_cost)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {}",
            ORDER_COLUMNS
        );
        sqlx::query_as(&sql)
            .bind(user_id)
            .bind(date.day() as i32)
            .bind(date.month() as i32)
            .bind(date.year())
            .bind(total_cost)
            .fetch_one(&mut *self.tx)
            .await
    }

    async fn insert_detail(
        &mut self,
        order_id: i64,
        line: &OrderLine,
    ) -> Result<OrderDetailRecord, sqlx::Error> {
        sqlx::query_as(
            "INSERT INTO order_details (order_id, flower_id, quantity, total_price)
             VALUES ($1, $2, $3, $4)
             RETURNING id, order_id, flower_id, quantity, total_price",
        )
        .bind(order_id)
        .bind(line.flower_id)
        .bind(line.quantity)
        .bind(line.total_price())
        .fetch_one(&mut *self.tx)
        .await
    }

    async fn add_spending(&mut self, user_id: i64, amount: Decimal) -> Result<Decimal, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO customer_spending (user_id, total_spending)
             VALUES ($1, $2)
             ON CONFLICT (user_id)
             DO UPDATE SET total_spending = customer_spending.total_spending + EXCLUDED.total_spending
             RETURNING total_spending",
        )
        .bind(user_id)
        .bind(amount)
        .fetch_one(&mut *self.tx)
        .await
    }

    async fn commit(self: Box<Self>) -> Result<(), sqlx::Error> {
        self.tx.commit().await
    }
}

//! In-memory store
//!
//! Implements the user, catalog and order stores without PostgreSQL. Used by
//! tests and by the service when no `postgres_url` is configured.
//!
//! Transactions hold the store lock for their whole lifetime and work on a
//! copy of the state; `commit` publishes the copy, dropping discards it.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::account::{NewUser, User, UserCredentials, UserStore};
use crate::catalog::{Flower, FlowerStore};
use crate::orders::{OrderDetailRecord, OrderFilter, OrderLine, OrderRecord, OrderStore, OrderTx};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    users: BTreeMap<i64, (User, String)>,
    flowers: BTreeMap<i64, Flower>,
    orders: BTreeMap<i64, OrderRecord>,
    details: BTreeMap<i64, OrderDetailRecord>,
    spending: BTreeMap<i64, Decimal>,
}

fn next_id<V>(map: &BTreeMap<i64, V>) -> i64 {
    map.keys().next_back().map_or(1, |last| last + 1)
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flowers(flowers: impl IntoIterator<Item = Flower>) -> Self {
        let state = MemoryState {
            flowers: flowers.into_iter().map(|f| (f.id, f)).collect(),
            ..Default::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Catalog used when running without a database
    pub fn demo() -> Self {
        Self::with_flowers([
            Flower::new(1, "Red Rose", Decimal::new(350, 2), 200),
            Flower::new(2, "White Lily", Decimal::new(425, 2), 120),
            Flower::new(3, "Sunflower", Decimal::new(275, 2), 150),
            Flower::new(4, "Tulip", Decimal::new(180, 2), 300),
            Flower::new(5, "Orchid", Decimal::new(1200, 2), 40),
            Flower::new(6, "Peony", Decimal::new(640, 2), 60),
        ])
    }

    /// Insert an order row directly, bypassing placement. Useful to build
    /// report fixtures spread over several dates.
    pub async fn insert_order(
        &self,
        user_id: i64,
        date: NaiveDate,
        lines: &[OrderLine],
    ) -> OrderRecord {
        let mut state = self.state.lock().await;
        let order = OrderRecord {
            id: next_id(&state.orders),
            user_id,
            day: date.day() as i32,
            month: date.month() as i32,
            year: date.year(),
            total_cost: lines.iter().map(OrderLine::total_price).sum(),
        };
        state.orders.insert(order.id, order.clone());
        for line in lines {
            let detail = OrderDetailRecord {
                id: next_id(&state.details),
                order_id: order.id,
                flower_id: line.flower_id,
                quantity: line.quantity,
                total_price: line.total_price(),
            };
            state.details.insert(detail.id, detail);
        }
        *state.spending.entry(user_id).or_insert(Decimal::ZERO) += order.total_cost;
        order
    }
}

// ============================================================================
// Users
// ============================================================================

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<Option<i64>, sqlx::Error> {
        let mut state = self.state.lock().await;
        let taken = state
            .users
            .values()
            .any(|(u, _)| u.username == user.username || u.email == user.email);
        if taken {
            return Ok(None);
        }
        let user_id = next_id(&state.users);
        let record = User {
            user_id,
            username: user.username,
            email: user.email,
            created_at: Utc::now(),
        };
        state.users.insert(user_id, (record, user.password_hash));
        Ok(Some(user_id))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserCredentials>, sqlx::Error> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .values()
            .find(|(u, _)| u.email == email)
            .map(|(u, hash)| UserCredentials {
                user_id: u.user_id,
                username: u.username.clone(),
                email: u.email.clone(),
                password_hash: hash.clone(),
            }))
    }

    async fn find_by_id(&self, user_id: i64) -> Result<Option<User>, sqlx::Error> {
        let state = self.state.lock().await;
        Ok(state.users.get(&user_id).map(|(u, _)| u.clone()))
    }
}

// ============================================================================
// Catalog
// ============================================================================

#[async_trait]
impl FlowerStore for MemoryStore {
    async fn list_flowers(&self) -> Result<Vec<Flower>, sqlx::Error> {
        let state = self.state.lock().await;
        Ok(state.flowers.values().cloned().collect())
    }

    async fn find_flower(&self, flower_id: i64) -> Result<Option<Flower>, sqlx::Error> {
        let state = self.state.lock().await;
        Ok(state.flowers.get(&flower_id).cloned())
    }
}

// ============================================================================
// Orders
// ============================================================================

#[async_trait]
impl OrderStore for MemoryStore {
    async fn begin(&self) -> Result<Box<dyn OrderTx>, sqlx::Error> {
        let guard = self.state.clone().lock_owned().await;
        let work = guard.clone();
        Ok(Box::new(MemoryTx { guard, work }))
    }

    async fn find_orders(
        &self,
        user_id: i64,
        filter: OrderFilter,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        let state = self.state.lock().await;
        Ok(state
            .orders
            .values()
            .filter(|o| o.user_id == user_id && filter.matches(o))
            .cloned()
            .collect())
    }

    async fn find_order(
        &self,
        user_id: i64,
        order_id: i64,
    ) -> Result<Option<OrderRecord>, sqlx::Error> {
        let state = self.state.lock().await;
        Ok(state
            .orders
            .get(&order_id)
            .filter(|o| o.user_id == user_id)
            .cloned())
    }

    async fn find_details(&self, order_ids: &[i64]) -> Result<Vec<OrderDetailRecord>, sqlx::Error> {
        let state = self.state.lock().await;
        Ok(state
            .details
            .values()
            .filter(|d| order_ids.contains(&d.order_id))
            .cloned()
            .collect())
    }

    async fn find_spending(&self, user_id: i64) -> Result<Option<Decimal>, sqlx::Error> {
        let state = self.state.lock().await;
        Ok(state.spending.get(&user_id).copied())
    }
}

struct MemoryTx {
    guard: OwnedMutexGuard<MemoryState>,
    work: MemoryState,
}

#[async_trait]
impl OrderTx for MemoryTx {
    async fn lock_flower(&mut self, flower_id: i64) -> Result<Option<Flower>, sqlx::Error> {
        Ok(self.work.flowers.get(&flower_id).cloned())
    }

    async fn decrement_stock(&mut self, flower_id: i64, quantity: i32) -> Result<(), sqlx::Error> {
        if let Some(flower) = self.work.flowers.get_mut(&flower_id) {
            flower.quantity -= quantity;
        }
        Ok(())
    }

    async fn insert_order(
        &mut self,
        user_id: i64,
        date: NaiveDate,
        total_cost: Decimal,
    ) -> Result<OrderRecord, sqlx::Error> {
        let order = OrderRecord {
            id: next_id(&self.work.orders),
            user_id,
            day: date.day() as i32,
            month: date.month() as i32,
            year: date.year(),
            total_cost,
        };
        self.work.orders.insert(order.id, order.clone());
        Ok(order)
    }

    async fn insert_detail(
        &mut self,
        order_id: i64,
        line: &OrderLine,
    ) -> Result<OrderDetailRecord, sqlx::Error> {
        let detail = OrderDetailRecord {
            id: next_id(&self.work.details),
            order_id,
            flower_id: line.flower_id,
            quantity: line.quantity,
            total_price: line.total_price(),
        };
        self.work.details.insert(detail.id, detail.clone());
        Ok(detail)
    }

    async fn add_spending(&mut self, user_id: i64, amount: Decimal) -> Result<Decimal, sqlx::Error> {
        let total = self.work.spending.entry(user_id).or_insert(Decimal::ZERO);
        *total += amount;
        Ok(*total)
    }

    async fn commit(self: Box<Self>) -> Result<(), sqlx::Error> {
        let MemoryTx { mut guard, work } = *self;
        *guard = work;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dropped_transaction_discards_writes() {
        let store = MemoryStore::with_flowers([Flower::new(1, "Rose", Decimal::ONE, 5)]);
        {
            let mut tx = store.begin().await.unwrap();
            tx.decrement_stock(1, 3).await.unwrap();
        }
        assert_eq!(store.find_flower(1).await.unwrap().unwrap().quantity, 5);

        let mut tx = store.begin().await.unwrap();
        tx.decrement_stock(1, 3).await.unwrap();
        tx.commit().await.unwrap();
        assert_eq!(store.find_flower(1).await.unwrap().unwrap().quantity, 2);
    }

    #[tokio::test]
    async fn test_duplicate_username_or_email_is_rejected() {
        let store = MemoryStore::new();
        let new_user = |username: &str, email: &str| NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
        };
        assert_eq!(
            store.create_user(new_user("ann", "ann@example.com")).await.unwrap(),
            Some(1)
        );
        assert_eq!(
            store.create_user(new_user("ann", "other@example.com")).await.unwrap(),
            None
        );
        assert_eq!(
            store.create_user(new_user("bob", "ann@example.com")).await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_find_order_is_scoped_to_owner() {
        let store = MemoryStore::new();
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let order = store.insert_order(1, date, &[]).await;
        assert!(store.find_order(1, order.id).await.unwrap().is_some());
        assert!(store.find_order(2, order.id).await.unwrap().is_none());
    }
}

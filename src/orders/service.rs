//! Order Service - placement and calendar reports
//!
//! Placement validates every requested line against live stock, decrements
//! stock line by line, then writes the order, its details and the customer's
//! running spending in one transaction. How the stock decrements commit is
//! controlled by [`StockCommitMode`].

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::calendar;
use super::error::OrderError;
use super::models::{
    OrderCreate, OrderDetailRecord, OrderItemRequest, OrderLine, OrderRecord, OrderResponse,
    SpendingResponse,
};
use super::repository::{OrderFilter, OrderStore, OrderTx};

/// How stock decrements are committed during placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockCommitMode {
    /// Each line's decrement commits on its own before the order is written.
    /// A later failing line leaves earlier decrements applied.
    #[default]
    PerLine,
    /// Stock decrements and the order write share one transaction.
    Atomic,
}

type Clock = Box<dyn Fn() -> NaiveDate + Send + Sync>;

pub struct OrderService {
    store: Arc<dyn OrderStore>,
    stock_commit: StockCommitMode,
    today: Clock,
}

impl OrderService {
    pub fn new(store: Arc<dyn OrderStore>, stock_commit: StockCommitMode) -> Self {
        Self {
            store,
            stock_commit,
            today: Box::new(|| Local::now().date_naive()),
        }
    }

    /// Replace the clock used to stamp new orders
    pub fn with_clock(mut self, today: impl Fn() -> NaiveDate + Send + Sync + 'static) -> Self {
        self.today = Box::new(today);
        self
    }

    pub fn stock_commit(&self) -> StockCommitMode {
        self.stock_commit
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub async fn get_all(&self, user_id: i64) -> Result<Vec<OrderResponse>, OrderError> {
        self.list(user_id, OrderFilter::All).await
    }

    pub async fn get_by_id(&self, user_id: i64, order_id: i64) -> Result<OrderResponse, OrderError> {
        if order_id < 1 {
            return Err(OrderError::InvalidArgument("order id must be positive"));
        }
        let order = self
            .store
            .find_order(user_id, order_id)
            .await?
            .ok_or(OrderError::NotFound { order_id })?;
        let mut expanded = self.expand(vec![order]).await?;
        expanded.pop().ok_or(OrderError::NotFound { order_id })
    }

    pub async fn daily_orders(
        &self,
        user_id: i64,
        day: i32,
        month: i32,
        year: i32,
    ) -> Result<Vec<OrderResponse>, OrderError> {
        self.list(user_id, calendar::daily(day, month, year)?).await
    }

    pub async fn monthly_orders(
        &self,
        user_id: i64,
        month: i32,
        year: i32,
    ) -> Result<Vec<OrderResponse>, OrderError> {
        self.list(user_id, calendar::monthly(month, year)?).await
    }

    pub async fn quarterly_orders(
        &self,
        user_id: i64,
        quarter: i32,
        year: i32,
    ) -> Result<Vec<OrderResponse>, OrderError> {
        self.list(user_id, calendar::quarterly(quarter, year)?).await
    }

    pub async fn yearly_orders(
        &self,
        user_id: i64,
        year: i32,
    ) -> Result<Vec<OrderResponse>, OrderError> {
        self.list(user_id, calendar::yearly(year)?).await
    }

    pub async fn spending(&self, user_id: i64) -> Result<SpendingResponse, OrderError> {
        let total_spending = self
            .store
            .find_spending(user_id)
            .await?
            .unwrap_or(Decimal::ZERO);
        Ok(SpendingResponse {
            user_id,
            total_spending,
        })
    }

    async fn list(
        &self,
        user_id: i64,
        filter: OrderFilter,
    ) -> Result<Vec<OrderResponse>, OrderError> {
        let orders = self.store.find_orders(user_id, filter).await?;
        tracing::debug!(user_id, ?filter, count = orders.len(), "Orders listed");
        self.expand(orders).await
    }

    /// Attach line items with one detail query for the whole batch
    async fn expand(&self, orders: Vec<OrderRecord>) -> Result<Vec<OrderResponse>, OrderError> {
        let ids: Vec<i64> = orders.iter().map(|o| o.id).collect();
        let mut by_order: HashMap<i64, Vec<OrderDetailRecord>> = HashMap::new();
        for detail in self.store.find_details(&ids).await? {
            by_order.entry(detail.order_id).or_default().push(detail);
        }

        Ok(orders
            .into_iter()
            .map(|order| {
                let details = by_order.remove(&order.id).unwrap_or_default();
                OrderResponse::expand(order, details)
            })
            .collect())
    }

    // ========================================================================
    // Placement
    // ========================================================================

    pub async fn create(&self, user_id: i64, req: OrderCreate) -> Result<OrderResponse, OrderError> {
        tracing::info!(
            user_id,
            lines = req.order_details.len(),
            mode = ?self.stock_commit,
            "Placing order"
        );

        match self.stock_commit {
            StockCommitMode::PerLine => {
                let mut lines = Vec::with_capacity(req.order_details.len());
                for (idx, item) in req.order_details.iter().enumerate() {
                    let mut tx = self.store.begin().await?;
                    let line = match take_stock(&mut tx, item).await {
                        Ok(line) => line,
                        Err(e) => {
                            if idx > 0 {
                                tracing::warn!(
                                    user_id,
                                    committed_lines = idx,
                                    "Order rejected after earlier stock decrements were committed"
                                );
                            }
                            return Err(e);
                        }
                    };
                    tx.commit().await?;
                    lines.push(line);
                }
                let mut tx = self.store.begin().await?;
                let order = self.write_order(&mut tx, user_id, &lines).await?;
                tx.commit().await?;
                Ok(order)
            }
            StockCommitMode::Atomic => {
                let mut tx = self.store.begin().await?;
                let mut lines = Vec::with_capacity(req.order_details.len());
                for item in &req.order_details {
                    lines.push(take_stock(&mut tx, item).await?);
                }
                let order = self.write_order(&mut tx, user_id, &lines).await?;
                tx.commit().await?;
                Ok(order)
            }
        }
    }

    async fn write_order(
        &self,
        tx: &mut Box<dyn OrderTx>,
        user_id: i64,
        lines: &[OrderLine],
    ) -> Result<OrderResponse, OrderError> {
        let total_cost: Decimal = lines.iter().map(OrderLine::total_price).sum();
        let order = tx.insert_order(user_id, (self.today)(), total_cost).await?;

        let mut details = Vec::with_capacity(lines.len());
        for line in lines {
            details.push(tx.insert_detail(order.id, line).await?);
        }

        let total_spending = tx.add_spending(user_id, total_cost).await?;
        tracing::info!(
            user_id,
            order_id = order.id,
            %total_cost,
            %total_spending,
            "Order placed"
        );
        Ok(OrderResponse::expand(order, details))
    }
}

/// Validate one line against live stock and decrement it
async fn take_stock(
    tx: &mut Box<dyn OrderTx>,
    item: &OrderItemRequest,
) -> Result<OrderLine, OrderError> {
    if item.flower_id < 1 || item.quantity < 1 {
        return Err(OrderError::InvalidOrder(format!(
            "flower_id and quantity must be positive (flower_id={}, quantity={})",
            item.flower_id, item.quantity
        )));
    }

    let flower = tx
        .lock_flower(item.flower_id)
        .await?
        .ok_or_else(|| OrderError::InvalidOrder(format!("flower {} not found", item.flower_id)))?;

    if item.quantity > flower.quantity {
        tracing::warn!(
            flower_id = flower.id,
            requested = item.quantity,
            available = flower.quantity,
            "Insufficient stock"
        );
        return Err(OrderError::InvalidOrder(format!(
            "insufficient stock for flower {}: requested {}, available {}",
            flower.id, item.quantity, flower.quantity
        )));
    }

    tx.decrement_stock(flower.id, item.quantity).await?;
    Ok(OrderLine {
        flower_id: flower.id,
        quantity: item.quantity,
        unit_price: flower.price,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Flower, FlowerStore};
    use crate::db::MemoryStore;

    fn rose() -> Flower {
        Flower::new(1, "Rose", Decimal::new(1000, 2), 10)
    }

    fn lily() -> Flower {
        Flower::new(2, "Lily", Decimal::new(500, 2), 4)
    }

    fn setup(mode: StockCommitMode) -> (Arc<MemoryStore>, OrderService) {
        let store = Arc::new(MemoryStore::with_flowers(vec![rose(), lily()]));
        let service = OrderService::new(store.clone(), mode)
            .with_clock(|| NaiveDate::from_ymd_opt(2024, 2, 14).unwrap());
        (store, service)
    }

    fn request(items: &[(i64, i32)]) -> OrderCreate {
        OrderCreate {
            order_details: items
                .iter()
                .map(|&(flower_id, quantity)| OrderItemRequest {
                    flower_id,
                    quantity,
                })
                .collect(),
        }
    }

    async fn stock(store: &MemoryStore, flower_id: i64) -> i32 {
        store.find_flower(flower_id).await.unwrap().unwrap().quantity
    }

    #[tokio::test]
    async fn test_create_prices_lines_and_stamps_date() {
        let (store, service) = setup(StockCommitMode::PerLine);
        let order = service.create(7, request(&[(1, 2), (2, 3)])).await.unwrap();

        assert_eq!(order.total_cost, Decimal::new(3500, 2));
        assert_eq!((order.day, order.month, order.year), (14, 2, 2024));
        let line_sum: Decimal = order.order_details.iter().map(|d| d.total_price).sum();
        assert_eq!(line_sum, order.total_cost);

        assert_eq!(stock(&store, 1).await, 8);
        assert_eq!(stock(&store, 2).await, 1);
    }

    #[tokio::test]
    async fn test_create_exact_stock_reaches_zero() {
        let (store, service) = setup(StockCommitMode::PerLine);
        service.create(7, request(&[(2, 4)])).await.unwrap();
        assert_eq!(stock(&store, 2).await, 0);
    }

    #[tokio::test]
    async fn test_create_rejects_over_stock_without_mutation() {
        let (store, service) = setup(StockCommitMode::PerLine);
        let err = service.create(7, request(&[(2, 5)])).await.unwrap_err();
        assert!(matches!(err, OrderError::InvalidOrder(_)));
        assert_eq!(err.code(), 300002);
        assert_eq!(stock(&store, 2).await, 4);
        assert!(service.get_all(7).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_non_positive_fields() {
        let (store, service) = setup(StockCommitMode::PerLine);
        for items in [[(0, 1)], [(1, 0)], [(-3, 2)], [(1, -2)]] {
            let err = service.create(7, request(&items)).await.unwrap_err();
            assert!(matches!(err, OrderError::InvalidOrder(_)), "{:?}", items);
        }
        assert_eq!(stock(&store, 1).await, 10);
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_flower() {
        let (_, service) = setup(StockCommitMode::PerLine);
        let err = service.create(7, request(&[(42, 1)])).await.unwrap_err();
        assert!(matches!(err, OrderError::InvalidOrder(_)));
    }

    #[tokio::test]
    async fn test_create_empty_order_records_zero_cost() {
        for mode in [StockCommitMode::PerLine, StockCommitMode::Atomic] {
            let (_, service) = setup(mode);
            let order = service.create(7, request(&[])).await.unwrap();
            assert_eq!(order.total_cost, Decimal::ZERO);
            assert!(order.order_details.is_empty());

            assert_eq!(service.get_all(7).await.unwrap().len(), 1);
            assert_eq!(
                service.spending(7).await.unwrap().total_spending,
                Decimal::ZERO
            );
        }
    }

    #[tokio::test]
    async fn test_duplicate_lines_see_earlier_decrements() {
        let (store, service) = setup(StockCommitMode::Atomic);
        let err = service
            .create(7, request(&[(2, 3), (2, 3)]))
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::InvalidOrder(_)));
        assert_eq!(stock(&store, 2).await, 4);

        service.create(7, request(&[(2, 2), (2, 2)])).await.unwrap();
        assert_eq!(stock(&store, 2).await, 0);
    }

    #[tokio::test]
    async fn test_per_line_mode_keeps_earlier_decrements_on_failure() {
        let (store, service) = setup(StockCommitMode::PerLine);
        let err = service
            .create(7, request(&[(1, 3), (2, 99)]))
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::InvalidOrder(_)));

        assert_eq!(stock(&store, 1).await, 7, "first line stays decremented");
        assert_eq!(stock(&store, 2).await, 4);
        assert!(service.get_all(7).await.unwrap().is_empty());
        assert_eq!(service.spending(7).await.unwrap().total_spending, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_atomic_mode_rolls_back_all_lines_on_failure() {
        let (store, service) = setup(StockCommitMode::Atomic);
        service
            .create(7, request(&[(1, 3), (2, 99)]))
            .await
            .unwrap_err();

        assert_eq!(stock(&store, 1).await, 10);
        assert_eq!(stock(&store, 2).await, 4);
    }

    #[tokio::test]
    async fn test_spending_accumulates_across_orders() {
        let (_, service) = setup(StockCommitMode::PerLine);
        // 3 x 10.00 = 30, then 5 x 10.00 = 50
        service.create(7, request(&[(1, 3)])).await.unwrap();
        assert_eq!(
            service.spending(7).await.unwrap().total_spending,
            Decimal::from(30)
        );
        service.create(7, request(&[(1, 5)])).await.unwrap();
        assert_eq!(
            service.spending(7).await.unwrap().total_spending,
            Decimal::from(80)
        );
    }

    #[tokio::test]
    async fn test_get_by_id_validates_and_scopes_to_user() {
        let (_, service) = setup(StockCommitMode::PerLine);
        let placed = service.create(7, request(&[(1, 1)])).await.unwrap();

        let err = service.get_by_id(7, 0).await.unwrap_err();
        assert!(matches!(err, OrderError::InvalidArgument(_)));
        assert_eq!(err.code(), 10);

        assert!(matches!(
            service.get_by_id(8, placed.id).await,
            Err(OrderError::NotFound { .. })
        ));
        assert!(matches!(
            service.get_by_id(7, placed.id + 100).await,
            Err(OrderError::NotFound { .. })
        ));

        let fetched = service.get_by_id(7, placed.id).await.unwrap();
        assert_eq!(fetched, placed);
    }

    #[tokio::test]
    async fn test_get_all_expands_each_order_with_its_lines() {
        let (_, service) = setup(StockCommitMode::PerLine);
        service.create(7, request(&[(1, 1), (2, 1)])).await.unwrap();
        service.create(7, request(&[(1, 2)])).await.unwrap();
        service.create(8, request(&[(1, 1)])).await.unwrap();

        let orders = service.get_all(7).await.unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].order_details.len(), 2);
        assert_eq!(orders[1].order_details.len(), 1);
        assert_eq!(orders[1].order_details[0].quantity, 2);
    }
}

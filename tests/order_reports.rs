//! Calendar report queries against a seeded in-memory store

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use flower_shop::orders::{OrderError, OrderLine, OrderService, StockCommitMode};
use flower_shop::{Flower, MemoryStore};

const ALICE: i64 = 1;
const BOB: i64 = 2;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn line(flower_id: i64, quantity: i32, cents: i64) -> OrderLine {
    OrderLine {
        flower_id,
        quantity,
        unit_price: Decimal::new(cents, 2),
    }
}

/// Alice: Jan 15, Mar 31, Apr 1, Jul 4 2024 and Jan 15 2023. Bob: Mar 31 2024.
async fn seeded() -> (MemoryStore, OrderService) {
    let store = MemoryStore::with_flowers([Flower::new(1, "Rose", Decimal::new(500, 2), 100)]);
    store.insert_order(ALICE, date(2024, 1, 15), &[line(1, 2, 500)]).await;
    store.insert_order(ALICE, date(2024, 3, 31), &[line(1, 1, 500)]).await;
    store.insert_order(ALICE, date(2024, 4, 1), &[line(1, 3, 500)]).await;
    store.insert_order(ALICE, date(2024, 7, 4), &[line(1, 4, 500)]).await;
    store.insert_order(ALICE, date(2023, 1, 15), &[line(1, 5, 500)]).await;
    store.insert_order(BOB, date(2024, 3, 31), &[line(1, 6, 500)]).await;

    let service = OrderService::new(Arc::new(store.clone()), StockCommitMode::PerLine);
    (store, service)
}

fn days(orders: &[flower_shop::orders::OrderResponse]) -> Vec<(i32, i32, i32)> {
    orders.iter().map(|o| (o.year, o.month, o.day)).collect()
}

#[tokio::test]
async fn quarter_boundaries_are_inclusive() {
    let (_, service) = seeded().await;

    let q1 = service.quarterly_orders(ALICE, 1, 2024).await.unwrap();
    assert_eq!(days(&q1), vec![(2024, 1, 15), (2024, 3, 31)]);

    let q2 = service.quarterly_orders(ALICE, 2, 2024).await.unwrap();
    assert_eq!(days(&q2), vec![(2024, 4, 1)]);

    let q3 = service.quarterly_orders(ALICE, 3, 2024).await.unwrap();
    assert_eq!(days(&q3), vec![(2024, 7, 4)]);

    assert!(service.quarterly_orders(ALICE, 4, 2024).await.unwrap().is_empty());
}

#[tokio::test]
async fn reports_only_include_the_callers_orders() {
    let (_, service) = seeded().await;

    let alice = service.daily_orders(ALICE, 31, 3, 2024).await.unwrap();
    assert_eq!(alice.len(), 1);
    assert_eq!(alice[0].order_details[0].quantity, 1);

    let bob = service.daily_orders(BOB, 31, 3, 2024).await.unwrap();
    assert_eq!(bob.len(), 1);
    assert_eq!(bob[0].order_details[0].quantity, 6);
}

#[tokio::test]
async fn monthly_and_yearly_partition_by_year() {
    let (_, service) = seeded().await;

    let jan_2024 = service.monthly_orders(ALICE, 1, 2024).await.unwrap();
    assert_eq!(days(&jan_2024), vec![(2024, 1, 15)]);

    let jan_2023 = service.monthly_orders(ALICE, 1, 2023).await.unwrap();
    assert_eq!(days(&jan_2023), vec![(2023, 1, 15)]);

    assert_eq!(service.yearly_orders(ALICE, 2024).await.unwrap().len(), 4);
    assert_eq!(service.yearly_orders(ALICE, 2023).await.unwrap().len(), 1);
    assert!(service.yearly_orders(ALICE, 2022).await.unwrap().is_empty());
}

#[tokio::test]
async fn report_totals_match_line_items() {
    let (_, service) = seeded().await;

    for order in service.get_all(ALICE).await.unwrap() {
        let lines: Decimal = order.order_details.iter().map(|d| d.total_price).sum();
        assert_eq!(order.total_cost, lines);
    }
    // 15 flowers at 5.00 across Alice's orders
    assert_eq!(
        service.spending(ALICE).await.unwrap().total_spending,
        Decimal::new(7500, 2)
    );
}

#[tokio::test]
async fn invalid_calendar_arguments_are_rejected() {
    let (_, service) = seeded().await;

    let err = service.daily_orders(ALICE, 30, 2, 2024).await.unwrap_err();
    assert!(matches!(err, OrderError::InvalidDate { .. }));
    assert_eq!(err.code(), 500001);

    let err = service.monthly_orders(ALICE, 13, 2024).await.unwrap_err();
    assert_eq!(err.code(), 500001);

    let err = service.quarterly_orders(ALICE, 5, 2024).await.unwrap_err();
    assert_eq!(err.code(), 11);

    let err = service.yearly_orders(ALICE, 0).await.unwrap_err();
    assert_eq!(err.code(), 10);

    // Leap day is a real date
    assert!(service.daily_orders(ALICE, 29, 2, 2024).await.unwrap().is_empty());
}

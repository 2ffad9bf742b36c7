//! Order rows, request and response schemas

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

// ============================================================================
// Stored Rows
// ============================================================================

/// `orders` row
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct OrderRecord {
    pub id: i64,
    pub user_id: i64,
    pub day: i32,
    pub month: i32,
    pub year: i32,
    pub total_cost: Decimal,
}

/// `order_details` row
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct OrderDetailRecord {
    pub id: i64,
    pub order_id: i64,
    pub flower_id: i64,
    pub quantity: i32,
    pub total_price: Decimal,
}

/// A line item that passed the stock check, priced at the current unit price
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub flower_id: i64,
    pub quantity: i32,
    pub unit_price: Decimal,
}

impl OrderLine {
    pub fn total_price(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_price
    }
}

// ============================================================================
// Request Schemas
// ============================================================================

/// Order placement request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct OrderCreate {
    pub order_details: Vec<OrderItemRequest>,
}

/// One requested line item. Signed so bad values reach validation.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct OrderItemRequest {
    #[schema(example = 1)]
    pub flower_id: i64,
    #[schema(example = 3)]
    pub quantity: i32,
}

// ============================================================================
// Response Schemas
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct OrderDetailResponse {
    pub id: i64,
    pub flower_id: i64,
    pub quantity: i32,
    #[schema(value_type = String, example = "10.50")]
    pub total_price: Decimal,
}

impl From<OrderDetailRecord> for OrderDetailResponse {
    fn from(d: OrderDetailRecord) -> Self {
        Self {
            id: d.id,
            flower_id: d.flower_id,
            quantity: d.quantity,
            total_price: d.total_price,
        }
    }
}

/// Order expanded with its line items
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: i64,
    #[schema(value_type = String, example = "10.50")]
    pub total_cost: Decimal,
    pub day: i32,
    pub month: i32,
    pub year: i32,
    pub order_details: Vec<OrderDetailResponse>,
}

impl OrderResponse {
    pub fn expand(order: OrderRecord, details: Vec<OrderDetailRecord>) -> Self {
        Self {
            id: order.id,
            total_cost: order.total_cost,
            day: order.day,
            month: order.month,
            year: order.year,
            order_details: details.into_iter().map(Into::into).collect(),
        }
    }
}

/// Lifetime spending of a customer
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SpendingResponse {
    pub user_id: i64,
    #[schema(value_type = String, example = "80.00")]
    pub total_spending: Decimal,
}

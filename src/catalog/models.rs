//! Flower catalog models

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

/// Catalog flower with live stock
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct Flower {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Red Rose")]
    pub name: String,
    /// Unit price
    #[schema(value_type = String, example = "3.50")]
    pub price: Decimal,
    /// Quantity on hand
    #[schema(example = 200)]
    pub quantity: i32,
}

impl Flower {
    pub fn new(id: i64, name: impl Into<String>, price: Decimal, quantity: i32) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            quantity,
        }
    }
}

use thiserror::Error;

use crate::gateway::types::error_codes;

#[derive(Error, Debug)]
pub enum OrderError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error("Argument out of range: {0}")]
    ArgumentOutOfRange(&'static str),

    #[error("Invalid order: {0}")]
    InvalidOrder(String),

    #[error("Order not found: {order_id}")]
    NotFound { order_id: i64 },

    #[error("Invalid date: {year:04}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: i32, day: i32 },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl OrderError {
    /// Numeric code carried in the API error envelope
    pub fn code(&self) -> i32 {
        match self {
            OrderError::InvalidArgument(_) => error_codes::INVALID_ARGUMENT,
            OrderError::ArgumentOutOfRange(_) => error_codes::INVALID_RANGE,
            OrderError::InvalidOrder(_) => error_codes::INVALID_ORDER,
            OrderError::NotFound { .. } => error_codes::ORDER_NOT_FOUND,
            OrderError::InvalidDate { .. } => error_codes::INVALID_DATE,
            OrderError::Database(_) => error_codes::INTERNAL_ERROR,
        }
    }
}

//! Order placement and calendar-bucketed order reports
//!
//! - [`service`]: placement transaction and report queries
//! - [`calendar`]: day/month/quarter/year argument validation
//! - [`repository`]: store traits and the PostgreSQL implementation
//! - [`handlers`]: HTTP endpoints under `/api/v1/user`

pub mod calendar;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;

pub use error::OrderError;
pub use models::{
    OrderCreate, OrderDetailRecord, OrderDetailResponse, OrderItemRequest, OrderLine,
    OrderRecord, OrderResponse, SpendingResponse,
};
pub use repository::{OrderFilter, OrderStore, OrderTx, PgOrderStore};
pub use service::{OrderService, StockCommitMode};

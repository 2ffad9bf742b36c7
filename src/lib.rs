//! Flower Shop - order service for a flower retailer
//!
//! # Modules
//!
//! - [`config`] - YAML configuration with env overrides
//! - [`logging`] - tracing subscriber setup
//! - [`db`] - PostgreSQL pool and the in-memory store
//! - [`account`] - User records and the user store
//! - [`catalog`] - Flower catalog browsing
//! - [`orders`] - Order placement and calendar reports
//! - [`user_auth`] - Registration, login and JWT middleware
//! - [`gateway`] - HTTP router, response envelope and OpenAPI docs

pub mod account;
pub mod catalog;
pub mod config;
pub mod db;
pub mod gateway;
pub mod logging;
pub mod orders;
pub mod user_auth;

// Convenient re-exports at crate root
pub use catalog::{CatalogService, Flower};
pub use config::AppConfig;
pub use db::{Database, MemoryStore};
pub use gateway::{build_router, state::AppState};
pub use orders::{OrderError, OrderService, StockCommitMode};
pub use user_auth::UserAuthService;

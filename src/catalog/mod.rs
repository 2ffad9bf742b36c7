//! Flower catalog (read-only browsing)

pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;

pub use models::Flower;
pub use repository::{FlowerStore, PgFlowerStore};
pub use service::{CatalogError, CatalogService};

//! Flower catalog data access

use async_trait::async_trait;
use sqlx::PgPool;

use super::models::Flower;

/// Read-only catalog access
#[async_trait]
pub trait FlowerStore: Send + Sync {
    /// All flowers, ascending id
    async fn list_flowers(&self) -> Result<Vec<Flower>, sqlx::Error>;

    /// Get flower by ID
    async fn find_flower(&self, flower_id: i64) -> Result<Option<Flower>, sqlx::Error>;
}

/// PostgreSQL-backed catalog
pub struct PgFlowerStore {
    pool: PgPool,
}

impl PgFlowerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FlowerStore for PgFlowerStore {
    async fn list_flowers(&self) -> Result<Vec<Flower>, sqlx::Error> {
        sqlx::query_as("SELECT id, name, price, quantity FROM flowers ORDER BY id")
            .fetch_all(&self.pool)
            .await
    }

    async fn find_flower(&self, flower_id: i64) -> Result<Option<Flower>, sqlx::Error> {
        sqlx::query_as("SELECT id, name, price, quantity FROM flowers WHERE id = $1")
            .bind(flower_id)
            .fetch_optional(&self.pool)
            .await
    }
}

use std::sync::Arc;

use thiserror::Error;

use super::models::Flower;
use super::repository::FlowerStore;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Invalid flower id: {0}")]
    InvalidId(i64),

    #[error("Flower not found: {0}")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub struct CatalogService {
    store: Arc<dyn FlowerStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn FlowerStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<Flower>, CatalogError> {
        Ok(self.store.list_flowers().await?)
    }

    pub async fn get(&self, flower_id: i64) -> Result<Flower, CatalogError> {
        if flower_id < 1 {
            return Err(CatalogError::InvalidId(flower_id));
        }
        self.store
            .find_flower(flower_id)
            .await?
            .ok_or(CatalogError::NotFound(flower_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use rust_decimal::Decimal;

    fn service() -> CatalogService {
        let store = MemoryStore::with_flowers(vec![
            Flower::new(1, "Rose", Decimal::new(350, 2), 10),
            Flower::new(2, "Tulip", Decimal::new(180, 2), 0),
        ]);
        CatalogService::new(Arc::new(store))
    }

    #[tokio::test]
    async fn test_list_returns_catalog_in_id_order() {
        let flowers = service().list().await.unwrap();
        let ids: Vec<i64> = flowers.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_get_rejects_non_positive_id() {
        assert!(matches!(
            service().get(0).await,
            Err(CatalogError::InvalidId(0))
        ));
    }

    #[tokio::test]
    async fn test_get_unknown_flower() {
        assert!(matches!(
            service().get(99).await,
            Err(CatalogError::NotFound(99))
        ));
    }

    #[tokio::test]
    async fn test_get_out_of_stock_flower_is_still_listed() {
        let tulip = service().get(2).await.unwrap();
        assert_eq!(tulip.quantity, 0);
    }
}

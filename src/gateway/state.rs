use std::sync::Arc;

use crate::catalog::CatalogService;
use crate::db::Database;
use crate::orders::OrderService;
use crate::user_auth::UserAuthService;

/// Gateway application state (shared by all handlers)
#[derive(Clone)]
pub struct AppState {
    /// Order placement and reporting
    pub orders: Arc<OrderService>,
    /// Flower catalog (read-only)
    pub catalog: Arc<CatalogService>,
    /// Registration, login and JWT verification
    pub user_auth: Arc<UserAuthService>,
    /// PostgreSQL pool, `None` when running on the in-memory store
    pub db: Option<Arc<Database>>,
}

impl AppState {
    pub fn new(
        orders: Arc<OrderService>,
        catalog: Arc<CatalogService>,
        user_auth: Arc<UserAuthService>,
        db: Option<Arc<Database>>,
    ) -> Self {
        Self {
            orders,
            catalog,
            user_auth,
            db,
        }
    }
}

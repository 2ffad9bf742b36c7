//! Flower Shop order service
//!
//! ```text
//! ┌──────────┐    ┌──────────┐    ┌──────────┐    ┌────────────┐
//! │  Config  │───▶│ Storage  │───▶│ Services │───▶│  Gateway   │
//! │  (YAML)  │    │(PG / mem)│    │(catalog, │    │ (axum HTTP)│
//! └──────────┘    └──────────┘    │ orders)  │    └────────────┘
//!                                 └──────────┘
//! ```
//!
//! Usage: `flower_shop [--env dev|prod] [--port 8080]`

use std::sync::Arc;

use flower_shop::account::{PgUserStore, UserStore};
use flower_shop::catalog::{CatalogService, FlowerStore, PgFlowerStore};
use flower_shop::config::AppConfig;
use flower_shop::db::{Database, MemoryStore};
use flower_shop::gateway::{self, state::AppState};
use flower_shop::orders::{OrderService, OrderStore, PgOrderStore};
use flower_shop::user_auth::UserAuthService;

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

/// Get port override from command line (--port argument)
fn get_port_override() -> Option<u16> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == "--port" && i + 1 < args.len() {
            return args[i + 1].parse().ok();
        }
    }
    None
}

struct Stores {
    users: Arc<dyn UserStore>,
    flowers: Arc<dyn FlowerStore>,
    orders: Arc<dyn OrderStore>,
    db: Option<Arc<Database>>,
}

async fn open_stores(config: &AppConfig) -> anyhow::Result<Stores> {
    let Some(ref url) = config.postgres_url else {
        tracing::warn!("No postgres_url configured, using in-memory store with demo catalog");
        let mem = MemoryStore::demo();
        return Ok(Stores {
            users: Arc::new(mem.clone()),
            flowers: Arc::new(mem.clone()),
            orders: Arc::new(mem),
            db: None,
        });
    };

    let db = Database::connect(url).await?;
    db.migrate().await?;
    tracing::info!("Connected to PostgreSQL, migrations applied");

    let pool = db.pool().clone();
    Ok(Stores {
        users: Arc::new(PgUserStore::new(pool.clone())),
        flowers: Arc::new(PgFlowerStore::new(pool.clone())),
        orders: Arc::new(PgOrderStore::new(pool)),
        db: Some(Arc::new(db)),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let mut app_config = AppConfig::load(&env)?;
    let _log_guard = flower_shop::logging::init_logging(&app_config);

    tracing::info!(
        "Starting Flower Shop in {} mode (build {})",
        env,
        env!("GIT_HASH")
    );

    if let Some(port) = get_port_override() {
        app_config.gateway.port = port;
    }

    let stores = open_stores(&app_config).await?;

    let orders = OrderService::new(stores.orders, app_config.orders.stock_commit);
    tracing::info!(stock_commit = ?orders.stock_commit(), "Order service ready");

    let state = Arc::new(AppState::new(
        Arc::new(orders),
        Arc::new(CatalogService::new(stores.flowers)),
        Arc::new(UserAuthService::new(
            stores.users,
            app_config.auth.jwt_secret.clone(),
            app_config.auth.token_ttl_hours,
        )),
        stores.db,
    ));

    gateway::run_server(&app_config.gateway, state).await
}

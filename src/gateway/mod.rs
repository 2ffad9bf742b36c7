pub mod handlers;
pub mod openapi;
pub mod state;
pub mod types;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::catalog::handlers as catalog;
use crate::config::GatewayConfig;
use crate::orders::handlers as orders;
use crate::user_auth::{handlers as user_auth, middleware::jwt_auth_middleware};
use state::AppState;

/// Build the complete HTTP router
pub fn build_router(state: Arc<AppState>) -> Router {
    // ==========================================================================
    // Auth Routes (public)
    // ==========================================================================
    let auth_routes = Router::new()
        .route("/register", post(user_auth::register))
        .route("/login", post(user_auth::login));

    // ==========================================================================
    // Catalog Routes (public)
    // ==========================================================================
    let flower_routes = Router::new()
        .route("/", get(catalog::list_flowers))
        .route("/{flower_id}", get(catalog::get_flower));

    // ==========================================================================
    // User Routes - Protected by JWT
    // ==========================================================================
    let user_routes = Router::new()
        .route("/me", get(user_auth::me))
        .route("/spending", get(orders::get_spending))
        .route(
            "/orders",
            get(orders::list_orders).post(orders::create_order),
        )
        // Static report paths take precedence over `{order_id}`
        .route("/orders/daily", get(orders::daily_orders))
        .route("/orders/monthly", get(orders::monthly_orders))
        .route("/orders/quarterly", get(orders::quarterly_orders))
        .route("/orders/yearly", get(orders::yearly_orders))
        .route("/orders/{order_id}", get(orders::get_order))
        .layer(from_fn_with_state(state.clone(), jwt_auth_middleware));

    Router::new()
        .route("/api/v1/health", get(handlers::health_check))
        .nest("/api/v1/auth", auth_routes)
        .nest("/api/v1/flowers", flower_routes)
        .nest("/api/v1/user", user_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
}

/// Start HTTP Gateway server
pub async fn run_server(config: &GatewayConfig, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", addr, e))?;

    tracing::info!("Gateway listening on http://{}", addr);
    tracing::info!("API Docs: http://{}/docs", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

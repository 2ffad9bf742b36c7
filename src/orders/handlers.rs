//! Order endpoints (JWT protected)

use std::sync::Arc;

use axum::{Extension, extract::State};
use serde::Deserialize;
use utoipa::IntoParams;

use super::models::{OrderCreate, OrderResponse, SpendingResponse};
use crate::gateway::state::AppState;
use crate::gateway::types::{
    ApiJson, ApiPath, ApiQuery, ApiResponse, ApiResult, created, ok,
};
use crate::user_auth::AuthenticatedUser;

#[derive(Debug, Deserialize, IntoParams)]
pub struct DailyQuery {
    pub day: i32,
    pub month: i32,
    pub year: i32,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct MonthlyQuery {
    pub month: i32,
    pub year: i32,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct QuarterlyQuery {
    /// 1..=4
    pub quarter: i32,
    pub year: i32,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct YearlyQuery {
    pub year: i32,
}

/// List all orders of the current user
///
/// GET /api/v1/user/orders
#[utoipa::path(
    get,
    path = "/api/v1/user/orders",
    responses(
        (status = 200, description = "Orders with line items", body = ApiResponse<Vec<OrderResponse>>),
        (status = 401, description = "Unauthorized")
    ),
    security(("jwt" = [])),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Vec<OrderResponse>> {
    ok(state.orders.get_all(user.user_id).await?)
}

/// Get one order of the current user
///
/// GET /api/v1/user/orders/{order_id}
#[utoipa::path(
    get,
    path = "/api/v1/user/orders/{order_id}",
    params(("order_id" = i64, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order with line items", body = ApiResponse<OrderResponse>),
        (status = 400, description = "Invalid order id (code 10)"),
        (status = 404, description = "Order not found (code 300003)")
    ),
    security(("jwt" = [])),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(order_id): ApiPath<i64>,
) -> ApiResult<OrderResponse> {
    ok(state.orders.get_by_id(user.user_id, order_id).await?)
}

/// Place an order
///
/// POST /api/v1/user/orders
#[utoipa::path(
    post,
    path = "/api/v1/user/orders",
    request_body = OrderCreate,
    responses(
        (status = 201, description = "Order placed", body = ApiResponse<OrderResponse>),
        (status = 400, description = "Malformed body (code 10), invalid order line or insufficient stock (code 300002)")
    ),
    security(("jwt" = [])),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiJson(req): ApiJson<OrderCreate>,
) -> ApiResult<OrderResponse> {
    created(state.orders.create(user.user_id, req).await?)
}

/// Orders placed on one calendar date
#[utoipa::path(
    get,
    path = "/api/v1/user/orders/daily",
    params(DailyQuery),
    responses(
        (status = 200, description = "Orders on that date", body = ApiResponse<Vec<OrderResponse>>),
        (status = 400, description = "Invalid date (code 500001)")
    ),
    security(("jwt" = [])),
    tag = "Reports"
)]
pub async fn daily_orders(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiQuery(q): ApiQuery<DailyQuery>,
) -> ApiResult<Vec<OrderResponse>> {
    ok(state
        .orders
        .daily_orders(user.user_id, q.day, q.month, q.year)
        .await?)
}

/// Orders placed in one month
#[utoipa::path(
    get,
    path = "/api/v1/user/orders/monthly",
    params(MonthlyQuery),
    responses(
        (status = 200, description = "Orders in that month", body = ApiResponse<Vec<OrderResponse>>),
        (status = 400, description = "Invalid date (code 500001)")
    ),
    security(("jwt" = [])),
    tag = "Reports"
)]
pub async fn monthly_orders(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiQuery(q): ApiQuery<MonthlyQuery>,
) -> ApiResult<Vec<OrderResponse>> {
    ok(state
        .orders
        .monthly_orders(user.user_id, q.month, q.year)
        .await?)
}

/// Orders placed in one quarter
#[utoipa::path(
    get,
    path = "/api/v1/user/orders/quarterly",
    params(QuarterlyQuery),
    responses(
        (status = 200, description = "Orders in that quarter", body = ApiResponse<Vec<OrderResponse>>),
        (status = 400, description = "Invalid year (code 10) or quarter (code 11)")
    ),
    security(("jwt" = [])),
    tag = "Reports"
)]
pub async fn quarterly_orders(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiQuery(q): ApiQuery<QuarterlyQuery>,
) -> ApiResult<Vec<OrderResponse>> {
    ok(state
        .orders
        .quarterly_orders(user.user_id, q.quarter, q.year)
        .await?)
}

/// Orders placed in one year
#[utoipa::path(
    get,
    path = "/api/v1/user/orders/yearly",
    params(YearlyQuery),
    responses(
        (status = 200, description = "Orders in that year", body = ApiResponse<Vec<OrderResponse>>),
        (status = 400, description = "Invalid year (code 10)")
    ),
    security(("jwt" = [])),
    tag = "Reports"
)]
pub async fn yearly_orders(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiQuery(q): ApiQuery<YearlyQuery>,
) -> ApiResult<Vec<OrderResponse>> {
    ok(state.orders.yearly_orders(user.user_id, q.year).await?)
}

/// Lifetime spending of the current user
#[utoipa::path(
    get,
    path = "/api/v1/user/spending",
    responses(
        (status = 200, description = "Running spending total", body = ApiResponse<SpendingResponse>)
    ),
    security(("jwt" = [])),
    tag = "Reports"
)]
pub async fn get_spending(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<SpendingResponse> {
    ok(state.orders.spending(user.user_id).await?)
}

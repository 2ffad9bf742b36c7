//! OpenAPI / Swagger UI Documentation
//!
//! - Swagger UI: `http://localhost:8080/docs`
//! - OpenAPI JSON: `http://localhost:8080/api-docs/openapi.json`

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::catalog::Flower;
use crate::gateway::handlers::HealthResponse;
use crate::orders::{
    OrderCreate, OrderDetailResponse, OrderItemRequest, OrderResponse, SpendingResponse,
};
use crate::user_auth::service::{AuthResponse, LoginRequest, RegisterRequest, UserProfile};

/// Bearer JWT issued by `/api/v1/auth/login`
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "jwt",
                SecurityScheme::Http(
                    Http::builder()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Main API Documentation struct
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Flower Shop API",
        version = "1.0.0",
        description = "Flower catalog, order placement and calendar order reports."
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::health_check,
        crate::user_auth::handlers::register,
        crate::user_auth::handlers::login,
        crate::user_auth::handlers::me,
        crate::catalog::handlers::list_flowers,
        crate::catalog::handlers::get_flower,
        crate::orders::handlers::list_orders,
        crate::orders::handlers::get_order,
        crate::orders::handlers::create_order,
        crate::orders::handlers::daily_orders,
        crate::orders::handlers::monthly_orders,
        crate::orders::handlers::quarterly_orders,
        crate::orders::handlers::yearly_orders,
        crate::orders::handlers::get_spending,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            UserProfile,
            Flower,
            OrderCreate,
            OrderItemRequest,
            OrderResponse,
            OrderDetailResponse,
            SpendingResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registration and login"),
        (name = "User", description = "Profile and spending (JWT required)"),
        (name = "Catalog", description = "Flower browsing (no auth required)"),
        (name = "Orders", description = "Order placement and lookup (JWT required)"),
        (name = "Reports", description = "Calendar-bucketed order reports (JWT required)"),
        (name = "System", description = "Health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::OpenApi;

    #[test]
    fn test_openapi_spec_generates() {
        let spec = ApiDoc::openapi();
        assert_eq!(spec.info.title, "Flower Shop API");
        assert!(spec.to_json().is_ok());
    }

    #[test]
    fn test_order_report_endpoints_registered() {
        let paths = ApiDoc::openapi().paths.paths;
        for path in [
            "/api/v1/health",
            "/api/v1/flowers/{flower_id}",
            "/api/v1/user/orders",
            "/api/v1/user/orders/{order_id}",
            "/api/v1/user/orders/daily",
            "/api/v1/user/orders/monthly",
            "/api/v1/user/orders/quarterly",
            "/api/v1/user/orders/yearly",
        ] {
            assert!(paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn test_health_documents_the_envelope() {
        let json = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let ok_body = json["paths"]["/api/v1/health"]["get"]["responses"]["200"].to_string();
        assert!(ok_body.contains("HealthResponse"));
        assert!(ok_body.contains("ApiResponse") || ok_body.contains("\"code\""));
    }

    #[test]
    fn test_security_scheme_registered() {
        let components = ApiDoc::openapi().components.expect("should have components");
        assert!(components.security_schemes.contains_key("jwt"));
    }
}

//! API Response types and error codes
//!
//! - `ApiResponse<T>`: Unified response wrapper
//! - `ApiError` / `ApiResult<T>`: Handler error channel
//! - `error_codes`: Standard error code constants

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::catalog::CatalogError;
use crate::orders::OrderError;
use crate::user_auth::AuthError;

// ============================================================================
// Unified API Response Format
// ============================================================================

/// Unified API response wrapper
///
/// All API responses follow this structure:
/// - code: 0 = success, non-zero = error code
/// - msg: short message description
/// - data: actual data (success) or null (error)
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response code: 0 for success, non-zero for errors
    #[schema(example = 0)]
    pub code: i32,
    /// Response message
    #[schema(example = "ok")]
    pub msg: String,
    /// Response data (only present when code == 0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Create success response
    pub fn success(data: T) -> Self {
        Self {
            code: error_codes::SUCCESS,
            msg: "ok".to_string(),
            data: Some(data),
        }
    }

    /// Create error response
    pub fn error(code: i32, msg: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            code,
            msg: msg.into(),
            data: None,
        }
    }
}

// ============================================================================
// Handler Result Types
// ============================================================================

pub type ApiResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), ApiError>;

/// Error returned by handlers, rendered as `ApiResponse<()>`
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: i32,
    pub msg: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: i32, msg: impl Into<String>) -> Self {
        Self {
            status,
            code,
            msg: msg.into(),
        }
    }

    pub fn bad_request(code: i32, msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, code, msg)
    }

    pub fn not_found(code: i32, msg: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, code, msg)
    }

    pub fn unauthorized(code: i32, msg: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, code, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            error_codes::INTERNAL_ERROR,
            msg,
        )
    }

    pub fn service_unavailable(msg: impl Into<String>) -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            error_codes::SERVICE_UNAVAILABLE,
            msg,
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ApiResponse::<()>::error(self.code, self.msg)),
        )
            .into_response()
    }
}

/// 200 OK with payload
pub fn ok<T>(data: T) -> ApiResult<T> {
    Ok((StatusCode::OK, Json(ApiResponse::success(data))))
}

/// 201 Created with payload
pub fn created<T>(data: T) -> ApiResult<T> {
    Ok((StatusCode::CREATED, Json(ApiResponse::success(data))))
}

// ============================================================================
// Domain Error Mapping
// ============================================================================

impl From<OrderError> for ApiError {
    fn from(e: OrderError) -> Self {
        match e {
            OrderError::NotFound { .. } => ApiError::not_found(e.code(), e.to_string()),
            OrderError::Database(ref db) => {
                tracing::error!(error = %db, "Order storage failure");
                ApiError::internal("Internal error")
            }
            _ => ApiError::bad_request(e.code(), e.to_string()),
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::InvalidId(_) => {
                ApiError::bad_request(error_codes::INVALID_ARGUMENT, e.to_string())
            }
            CatalogError::NotFound(_) => {
                ApiError::not_found(error_codes::FLOWER_NOT_FOUND, e.to_string())
            }
            CatalogError::Database(ref db) => {
                tracing::error!(error = %db, "Catalog storage failure");
                ApiError::internal("Internal error")
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Validation(_) => {
                ApiError::bad_request(error_codes::VALIDATION_FAILED, e.to_string())
            }
            AuthError::UserExists => ApiError::new(
                StatusCode::CONFLICT,
                error_codes::USER_ALREADY_EXISTS,
                "Username or email already exists",
            ),
            AuthError::InvalidCredentials => ApiError::unauthorized(
                error_codes::INVALID_CREDENTIALS,
                "Invalid email or password",
            ),
            AuthError::InvalidToken => {
                ApiError::unauthorized(error_codes::AUTH_FAILED, "Invalid or expired token")
            }
            AuthError::UserNotFound(_) => {
                ApiError::not_found(error_codes::USER_NOT_FOUND, e.to_string())
            }
            AuthError::PasswordHash(_) | AuthError::Token(_) | AuthError::Database(_) => {
                tracing::error!(error = %e, "Auth service failure");
                ApiError::internal("Internal error")
            }
        }
    }
}

// ============================================================================
// Error Codes
// ============================================================================

/// Standard API error codes
pub mod error_codes {
    // Success
    pub const SUCCESS: i32 = 0;

    // Argument errors
    pub const INVALID_ARGUMENT: i32 = 10;
    pub const INVALID_RANGE: i32 = 11;

    // Auth errors (1xxxxx)
    pub const USER_ALREADY_EXISTS: i32 = 100001;
    pub const INVALID_CREDENTIALS: i32 = 100002;
    pub const MISSING_AUTH: i32 = 100003;
    pub const AUTH_FAILED: i32 = 100004;
    pub const VALIDATION_FAILED: i32 = 100005;
    pub const USER_NOT_FOUND: i32 = 100006;

    // Catalog errors (2xxxxx)
    pub const FLOWER_NOT_FOUND: i32 = 200001;

    // Order errors (3xxxxx)
    pub const INVALID_ORDER: i32 = 300002;
    pub const ORDER_NOT_FOUND: i32 = 300003;

    // Calendar errors (5xxxxx)
    pub const INVALID_DATE: i32 = 500001;

    // Server errors (9xxxxx)
    pub const INTERNAL_ERROR: i32 = 900000;
    pub const SERVICE_UNAVAILABLE: i32 = 900001;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_envelope_omits_data() {
        let json = serde_json::to_value(ApiResponse::<()>::error(300003, "Order not found")).unwrap();
        assert_eq!(json["code"], 300003);
        assert_eq!(json["msg"], "Order not found");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_order_errors_map_to_status() {
        let e: ApiError = OrderError::NotFound { order_id: 7 }.into();
        assert_eq!(e.status, StatusCode::NOT_FOUND);
        assert_eq!(e.code, error_codes::ORDER_NOT_FOUND);

        let e: ApiError = OrderError::InvalidDate {
            year: 2024,
            month: 4,
            day: 31,
        }
        .into();
        assert_eq!(e.status, StatusCode::BAD_REQUEST);
        assert_eq!(e.code, error_codes::INVALID_DATE);
    }

    #[test]
    fn test_service_unavailable_renders_envelope() {
        let e = ApiError::service_unavailable("unavailable");
        assert_eq!(e.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(e.code, error_codes::SERVICE_UNAVAILABLE);
        assert_eq!(
            e.into_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_auth_errors_map_to_status() {
        let e: ApiError = AuthError::UserExists.into();
        assert_eq!(e.status, StatusCode::CONFLICT);
        let e: ApiError = AuthError::InvalidCredentials.into();
        assert_eq!(e.status, StatusCode::UNAUTHORIZED);
        assert_eq!(e.code, error_codes::INVALID_CREDENTIALS);
    }
}

//! Gateway types module
//!
//! - [`ApiResponse<T>`]: Unified API response wrapper
//! - [`ApiError`] / [`ApiResult`]: Handler error channel mapped from domain errors
//! - [`ApiJson`] / [`ApiQuery`] / [`ApiPath`]: Extractors whose rejections use the envelope
//! - [`error_codes`]: Numeric codes carried in every error envelope

pub mod extract;
pub mod response;

pub use extract::{ApiJson, ApiPath, ApiQuery};
pub use response::{ApiError, ApiResponse, ApiResult, created, error_codes, ok};

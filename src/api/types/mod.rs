//! Shared API types - errors, extractors, pagination

mod error;
mod json;
mod pagination;

pub use error::{ApiError, ApiErrorDetail, ApiErrorResponse, ApiErrorType};
pub use json::Json;
pub use pagination::{PageQuery, PaginationMeta};

//! Pagination query parameters and response envelope

use serde::{Deserialize, Serialize};

use crate::domain::page::{PagedResult, PageRequest};

/// Query parameters for paginated list endpoints
#[derive(Debug, Clone, Copy, Deserialize, Default)]
pub struct PageQuery {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
}

impl PageQuery {
    /// Resolve to a PageRequest with the given defaults and cap
    pub fn resolve(&self, default_per_page: u32, max_per_page: u32) -> PageRequest {
        PageRequest::new(
            self.page.unwrap_or(1),
            self.per_page.unwrap_or(default_per_page),
            max_per_page,
        )
    }
}

/// Pagination metadata in list responses
#[derive(Debug, Clone, Serialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub per_page: u32,
    pub total: usize,
    pub pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

impl<T> From<&PagedResult<T>> for PaginationMeta {
    fn from(result: &PagedResult<T>) -> Self {
        Self {
            page: result.page,
            per_page: result.per_page,
            total: result.total,
            pages: result.pages(),
            has_next: result.has_next(),
            has_prev: result.has_prev(),
        }
    }
}

//! Pagination primitives shared by repositories and API surfaces

use serde::{Deserialize, Serialize};

/// A validated page request. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    per_page: u32,
}

impl PageRequest {
    /// Create a page request, clamping to sane bounds.
    ///
    /// `page` is clamped to at least 1, `per_page` to 1..=max.
    pub fn new(page: u32, per_page: u32, max_per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, max_per_page),
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Zero-based offset of the first item on this page
    pub fn offset(&self) -> usize {
        ((self.page - 1) as usize) * (self.per_page as usize)
    }
}

/// One page of results plus the total item count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: u32,
    pub per_page: u32,
}

impl<T> PagedResult<T> {
    pub fn new(items: Vec<T>, total: usize, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page(),
            per_page: request.per_page(),
        }
    }

    /// Total number of pages (at least 1)
    pub fn pages(&self) -> u32 {
        let per_page = self.per_page.max(1) as usize;
        (self.total.div_ceil(per_page) as u32).max(1)
    }

    pub fn has_next(&self) -> bool {
        self.page < self.pages()
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// Map items into another type, keeping the page geometry
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PagedResult<U> {
        PagedResult {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
        }
    }
}

/// Slice a full result set down to one page. Backends without native
/// pagination filter first, then call this.
pub fn paginate<T>(mut items: Vec<T>, request: PageRequest) -> PagedResult<T> {
    let total = items.len();
    let start = request.offset().min(total);
    let end = (start + request.per_page() as usize).min(total);
    let page_items = items.drain(start..end).collect();

    PagedResult::new(page_items, total, request)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_clamping() {
        let req = PageRequest::new(0, 500, 100);
        assert_eq!(req.page(), 1);
        assert_eq!(req.per_page(), 100);

        let req = PageRequest::new(3, 0, 100);
        assert_eq!(req.per_page(), 1);
    }

    #[test]
    fn test_offset() {
        assert_eq!(PageRequest::new(1, 20, 100).offset(), 0);
        assert_eq!(PageRequest::new(3, 20, 100).offset(), 40);
    }

    #[test]
    fn test_paginate() {
        let items: Vec<u32> = (0..45).collect();
        let result = paginate(items, PageRequest::new(2, 20, 100));

        assert_eq!(result.total, 45);
        assert_eq!(result.items.len(), 20);
        assert_eq!(result.items[0], 20);
        assert_eq!(result.pages(), 3);
        assert!(result.has_next());
        assert!(result.has_prev());
    }

    #[test]
    fn test_paginate_past_end() {
        let items: Vec<u32> = (0..5).collect();
        let result = paginate(items, PageRequest::new(4, 20, 100));

        assert_eq!(result.total, 5);
        assert!(result.items.is_empty());
        assert_eq!(result.pages(), 1);
        assert!(!result.has_next());
    }

    #[test]
    fn test_empty_result_has_one_page() {
        let result = paginate(Vec::<u32>::new(), PageRequest::new(1, 20, 100));
        assert_eq!(result.pages(), 1);
        assert!(!result.has_next());
        assert!(!result.has_prev());
    }
}

//! Page-number pagination.
//!
//! Listings are sliced into fixed-size pages. The requested size is clamped to
//! the configured maximum; `page_size = 0` or an absent size means the default.

use promptvault_common::config::PaginationConfig;
use promptvault_common::{AppError, AppResult};
use serde::Deserialize;

/// Page parameters as they arrive from a request.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: Option<u64>,
    /// Requested page size.
    pub page_size: Option<u64>,
}

impl PageRequest {
    #[must_use]
    pub const fn new(page: u64, page_size: u64) -> Self {
        Self {
            page: Some(page),
            page_size: Some(page_size),
        }
    }
}

/// Default and maximum page sizes.
#[derive(Debug, Clone, Copy)]
pub struct PaginationPolicy {
    default_page_size: u64,
    max_page_size: u64,
}

impl PaginationPolicy {
    /// Create a policy. A zero maximum is raised to 1 and the default never
    /// exceeds the maximum.
    #[must_use]
    pub const fn new(default_page_size: u64, max_page_size: u64) -> Self {
        let max_page_size = if max_page_size == 0 { 1 } else { max_page_size };
        let default_page_size = if default_page_size == 0 || default_page_size > max_page_size {
            max_page_size
        } else {
            default_page_size
        };
        Self {
            default_page_size,
            max_page_size,
        }
    }

    #[must_use]
    pub const fn max_page_size(&self) -> u64 {
        self.max_page_size
    }

    /// Resolve a request into a concrete window.
    pub fn resolve(&self, request: PageRequest) -> AppResult<PageWindow> {
        let page = request.page.unwrap_or(1);
        if page < 1 {
            return Err(AppError::BadRequest("page must be at least 1".to_string()));
        }

        let page_size = match request.page_size {
            None | Some(0) => self.default_page_size,
            Some(size) => size.min(self.max_page_size),
        };

        Ok(PageWindow { page, page_size })
    }
}

impl Default for PaginationPolicy {
    fn default() -> Self {
        PaginationConfig::default().into()
    }
}

impl From<PaginationConfig> for PaginationPolicy {
    fn from(config: PaginationConfig) -> Self {
        Self::new(config.default_page_size, config.max_page_size)
    }
}

/// A resolved page number and size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u64,
    pub page_size: u64,
}

impl PageWindow {
    /// Number of items before this page.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    /// Number of pages for `count` items. An empty listing still has one
    /// (empty) page.
    #[must_use]
    pub const fn num_pages(&self, count: u64) -> u64 {
        if count == 0 {
            1
        } else {
            count.div_ceil(self.page_size)
        }
    }

    /// Reject page numbers beyond the last page.
    pub fn check(&self, count: u64) -> AppResult<()> {
        if self.page > self.num_pages(count) {
            return Err(AppError::NotFound("Invalid page".to_string()));
        }
        Ok(())
    }

    /// Wrap the items already fetched for this window.
    #[must_use]
    pub fn into_page<T>(self, count: u64, items: Vec<T>) -> Page<T> {
        let num_pages = self.num_pages(count);
        Page {
            count,
            next: (self.page < num_pages).then_some(self.page + 1),
            previous: (self.page > 1).then_some(self.page - 1),
            page: self.page,
            page_size: self.page_size,
            items,
        }
    }

    /// Slice a fully materialized, already ordered sequence.
    pub fn slice<T>(self, items: Vec<T>) -> AppResult<Page<T>> {
        let count = items.len() as u64;
        self.check(count)?;

        let offset = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        let size = usize::try_from(self.page_size).unwrap_or(usize::MAX);
        let page_items = items.into_iter().skip(offset).take(size).collect();

        Ok(self.into_page(count, page_items))
    }
}

/// One page of a listing with its navigation metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Total number of items across all pages.
    pub count: u64,
    /// Next page number, if any.
    pub next: Option<u64>,
    /// Previous page number, if any.
    pub previous: Option<u64>,
    pub page: u64,
    pub page_size: u64,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    /// Transform the items, keeping the metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            count: self.count,
            next: self.next,
            previous: self.previous,
            page: self.page,
            page_size: self.page_size,
            items: self.items.into_iter().map(f).collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn policy() -> PaginationPolicy {
        PaginationPolicy::new(5, 50)
    }

    #[test]
    fn test_default_page_size() {
        let window = policy().resolve(PageRequest::default()).unwrap();
        assert_eq!(window, PageWindow { page: 1, page_size: 5 });

        let window = policy().resolve(PageRequest::new(2, 0)).unwrap();
        assert_eq!(window.page_size, 5);
    }

    #[test]
    fn test_page_size_clamped_to_max() {
        let window = policy().resolve(PageRequest::new(1, 500)).unwrap();
        assert_eq!(window.page_size, 50);
    }

    #[test]
    fn test_page_zero_rejected() {
        let result = policy().resolve(PageRequest::new(0, 5));
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_empty_result_is_empty_page() {
        let window = policy().resolve(PageRequest::default()).unwrap();
        let page = window.slice(Vec::<u32>::new()).unwrap();

        assert_eq!(page.count, 0);
        assert_eq!(page.next, None);
        assert_eq!(page.previous, None);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_slice_middle_page() {
        let window = policy().resolve(PageRequest::new(2, 3)).unwrap();
        let page = window.slice((1..=8).collect::<Vec<u32>>()).unwrap();

        assert_eq!(page.items, vec![4, 5, 6]);
        assert_eq!(page.count, 8);
        assert_eq!(page.next, Some(3));
        assert_eq!(page.previous, Some(1));
    }

    #[test]
    fn test_last_page_has_no_next() {
        let window = policy().resolve(PageRequest::new(3, 3)).unwrap();
        let page = window.slice((1..=8).collect::<Vec<u32>>()).unwrap();

        assert_eq!(page.items, vec![7, 8]);
        assert_eq!(page.next, None);
    }

    #[test]
    fn test_page_past_end_is_invalid() {
        let window = policy().resolve(PageRequest::new(4, 3)).unwrap();
        let result = window.slice((1..=8).collect::<Vec<u32>>());
        assert!(matches!(result, Err(AppError::NotFound(msg)) if msg == "Invalid page"));

        let window = policy().resolve(PageRequest::new(2, 3)).unwrap();
        assert!(window.slice(Vec::<u32>::new()).is_err());
    }

    #[test]
    fn test_policy_normalizes_limits() {
        let policy = PaginationPolicy::new(100, 0);
        let window = policy.resolve(PageRequest::default()).unwrap();
        assert_eq!(window.page_size, 1);
    }

    #[test]
    fn test_map_keeps_metadata() {
        let window = policy().resolve(PageRequest::new(1, 2)).unwrap();
        let page = window.slice(vec![1, 2, 3]).unwrap().map(|n| n * 10);

        assert_eq!(page.items, vec![10, 20]);
        assert_eq!(page.next, Some(2));
        assert_eq!(page.count, 3);
    }
}

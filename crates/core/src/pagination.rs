//! Page-based pagination helpers (`?page=&limit=`).

/// Default page size for a user's own alert list.
pub const DEFAULT_PAGE_LIMIT: i64 = 10;

/// Default page size for the admin alert list.
pub const DEFAULT_ADMIN_PAGE_LIMIT: i64 = 50;

/// Upper bound on any page size.
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Clamp an optional limit into `1..=max`, using `default` when absent.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).clamp(1, max)
}

/// A 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    pub fn new(page: Option<i64>, limit: Option<i64>, default_limit: i64) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: clamp_limit(limit, default_limit, MAX_PAGE_LIMIT),
        }
    }

    /// Number of rows to skip.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// Computed pagination metadata for a result page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub page: i64,
    pub total_items: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PageInfo {
    pub fn new(request: PageRequest, total_items: i64) -> Self {
        let total_pages = (total_items + request.limit - 1) / request.limit;
        Self {
            page: request.page,
            total_items,
            total_pages,
            has_next: request.page.saturating_mul(request.limit) < total_items,
            has_prev: request.page > 1,
        }
    }
}

//! Pagination: request parsing and page metadata.
//!
//! A page request past the end of the result set is clamped to the last
//! page, so metadata always describes a page that exists. An empty result
//! set reports page 1 of 1 with `from`/`to` set to null.

use serde::Serialize;

use crate::error::FieldErrors;

/// Default page number when the caller omits `page`.
pub const DEFAULT_PAGE: i64 = 1;

/// Default page size when the caller omits `limit`.
pub const DEFAULT_PER_PAGE: i64 = 12;

/// Upper bound on the page size.
pub const MAX_PER_PAGE: i64 = 100;

/// A validated page/limit pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub per_page: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl PageRequest {
    /// Validate raw `page`/`limit` parameters, recording violations into
    /// `errors`. Non-positive values are rejected; oversized limits are
    /// clamped to [`MAX_PER_PAGE`].
    pub fn collect(
        page: Option<i64>,
        limit: Option<i64>,
        errors: &mut FieldErrors,
    ) -> Self {
        let page = match page {
            Some(p) if p <= 0 => {
                errors.push("page", "must be a positive integer");
                DEFAULT_PAGE
            }
            Some(p) => p,
            None => DEFAULT_PAGE,
        };
        let per_page = match limit {
            Some(l) if l <= 0 => {
                errors.push("limit", "must be a positive integer");
                DEFAULT_PER_PAGE
            }
            Some(l) => l.min(MAX_PER_PAGE),
            None => DEFAULT_PER_PAGE,
        };
        Self { page, per_page }
    }
}

/// Pagination metadata attached to every listing response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub current_page: i64,
    pub last_page: i64,
    pub per_page: i64,
    pub total: i64,
    /// 1-based index of the first item on the page, null when empty.
    pub from: Option<i64>,
    /// 1-based index of the last item on the page, null when empty.
    pub to: Option<i64>,
}

impl PageMeta {
    /// Compute metadata for `total` matching rows, clamping the requested
    /// page into the valid range.
    pub fn compute(total: i64, request: PageRequest) -> Self {
        let per_page = request.per_page;
        let last_page = if total == 0 {
            1
        } else {
            (total + per_page - 1) / per_page
        };
        let current_page = request.page.min(last_page);
        let offset = (current_page - 1) * per_page;
        let (from, to) = if total == 0 {
            (None, None)
        } else {
            (Some(offset + 1), Some((offset + per_page).min(total)))
        };
        Self {
            current_page,
            last_page,
            per_page,
            total,
            from,
            to,
        }
    }

    /// Row offset of the (clamped) current page.
    pub fn offset(&self) -> i64 {
        (self.current_page - 1) * self.per_page
    }
}

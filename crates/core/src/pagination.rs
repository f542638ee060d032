//! Offset pagination helpers shared by list endpoints.

use serde::Serialize;

/// Largest page size a client may request.
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Default page size when none is given.
pub const DEFAULT_PAGE_LIMIT: i64 = 20;

/// Pagination metadata included in list response envelopes.
#[derive(Debug, Clone, Serialize)]
pub struct PaginationMeta {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

impl PaginationMeta {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        let pages = if total == 0 { 1 } else { (total + limit - 1) / limit };
        Self {
            page: page.max(1),
            limit: limit.max(1),
            total,
            pages: pages.max(1),
        }
    }
}

/// Clamp a requested `(page, limit)` pair to sane bounds and return it with
/// the corresponding row offset.
pub fn clamp_page(page: Option<i64>, limit: Option<i64>) -> (i64, i64, i64) {
    let page = page.unwrap_or(1).max(1);
    let limit = limit
        .unwrap_or(DEFAULT_PAGE_LIMIT)
        .clamp(1, MAX_PAGE_LIMIT);
    let offset = (page - 1) * limit;
    (page, limit, offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meta_rounds_pages_up() {
        let meta = PaginationMeta::new(1, 20, 41);
        assert_eq!(meta.pages, 3);
    }

    #[test]
    fn meta_never_reports_zero_pages() {
        let meta = PaginationMeta::new(1, 20, 0);
        assert_eq!(meta.pages, 1);
        assert_eq!(meta.total, 0);
    }

    #[test]
    fn clamps_limit_to_max() {
        let (page, limit, offset) = clamp_page(Some(2), Some(500));
        assert_eq!((page, limit, offset), (2, 100, 100));
    }

    #[test]
    fn defaults() {
        let (page, limit, offset) = clamp_page(None, None);
        assert_eq!((page, limit, offset), (1, 20, 0));
    }

    #[test]
    fn rejects_nonpositive_page() {
        let (page, _, offset) = clamp_page(Some(0), None);
        assert_eq!(page, 1);
        assert_eq!(offset, 0);
    }
}

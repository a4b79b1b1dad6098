//! Page/limit windowing shared by the product and image listings.

use serde::Serialize;

/// Page used when the client omits `page`.
pub const DEFAULT_PAGE: i64 = 1;

/// Page size used when the client omits `limit`.
pub const DEFAULT_LIMIT: i64 = 10;

/// Row offset for a 1-based `page` of `limit` rows.
///
/// Callers validate `page >= 1` and `limit >= 1`; out-of-range input is
/// floored so the result is never negative.
pub fn offset(page: i64, limit: i64) -> i64 {
    (page.max(1) - 1).saturating_mul(limit.max(1))
}

/// Number of pages needed for `total` rows, i.e. `ceil(total / limit)`.
pub fn total_pages(total: i64, limit: i64) -> i64 {
    let limit = limit.max(1);
    let total = total.max(0);
    total / limit + i64::from(total % limit != 0)
}

/// Page metadata echoed back to clients alongside each listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_items: i64,
    pub items_per_page: i64,
}

impl PageMeta {
    pub fn new(page: i64, limit: i64, total_items: i64) -> Self {
        Self {
            current_page: page,
            total_pages: total_pages(total_items, limit),
            total_items,
            items_per_page: limit,
        }
    }
}

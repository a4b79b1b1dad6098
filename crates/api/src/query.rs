//! Shared query parameter types for API handlers.

use catalog_core::pagination::{DEFAULT_LIMIT, DEFAULT_PAGE};
use catalog_core::types::DbId;
use serde::Deserialize;
use validator::Validate;

/// Pagination parameters (`?page=&limit=`), both 1-based and optional.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct PaginationParams {
    #[validate(range(min = 1, message = "Page must be a positive integer."))]
    pub page: Option<i64>,
    #[validate(range(min = 1, message = "Limit must be a positive integer."))]
    pub limit: Option<i64>,
}

impl PaginationParams {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(DEFAULT_PAGE)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }
}

/// Query parameters for the product listing.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ProductListParams {
    #[validate(range(min = 1, message = "Page must be a positive integer."))]
    pub page: Option<i64>,
    #[validate(range(min = 1, message = "Limit must be a positive integer."))]
    pub limit: Option<i64>,
    /// Restrict the listing to products linked to this category.
    pub category_id: Option<DbId>,
}

impl ProductListParams {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(DEFAULT_PAGE)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }
}

//! Request handlers for the catalog entities.
//!
//! Each submodule provides async handler functions for a single resource.
//! Handlers validate input through the extractors in [`crate::extract`],
//! delegate to the corresponding repository in `catalog_db` and map errors
//! via [`AppError`](crate::error::AppError).

pub mod category;
pub mod product;
pub mod product_details;
pub mod product_image;

use catalog_core::product_id::{is_valid_product_id, PRODUCT_ID_FORMAT_MESSAGE};

use crate::error::{AppError, AppResult};

/// Reject a malformed product id carried in `field`.
pub(crate) fn check_product_id(field: &str, id: &str) -> AppResult<()> {
    if is_valid_product_id(id) {
        Ok(())
    } else {
        Err(AppError::field(field, PRODUCT_ID_FORMAT_MESSAGE))
    }
}

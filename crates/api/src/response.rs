//! Shared response body types for API handlers.

use catalog_core::pagination::PageMeta;
use catalog_db::models::product::ProductListItem;
use catalog_db::models::product_image::{ProductImage, ProductImageWithProduct};
use serde::Serialize;

/// `{ "message": ... }` body returned by deletions.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// One page of products with its page metadata inlined.
#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    #[serde(flatten)]
    pub meta: PageMeta,
    pub products: Vec<ProductListItem>,
}

/// One page of images with its page metadata inlined.
#[derive(Debug, Serialize)]
pub struct ImageListResponse {
    #[serde(flatten)]
    pub meta: PageMeta,
    pub images: Vec<ProductImageWithProduct>,
}

/// Body returned after a successful upload.
#[derive(Debug, Serialize)]
pub struct ImageUploadResponse {
    pub message: String,
    pub image: ProductImage,
    /// Absolute URL of the stored file.
    #[serde(rename = "imageUrl")]
    pub image_url: String,
}

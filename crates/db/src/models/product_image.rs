//! Product image references.

use catalog_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `product_images` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct ProductImage {
    pub image_id: DbId,
    pub product_id: String,
    pub image_url: String,
}

/// The id and name of the product owning an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageProductSummary {
    pub product_id: String,
    pub product_name: String,
}

/// An image joined with its owning product's summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductImageWithProduct {
    #[serde(flatten)]
    pub image: ProductImage,
    pub product: ImageProductSummary,
}

/// Flat row produced by the images/products join.
#[derive(Debug, FromRow)]
pub struct ImageJoinRow {
    pub image_id: DbId,
    pub product_id: String,
    pub image_url: String,
    pub product_name: String,
}

impl From<ImageJoinRow> for ProductImageWithProduct {
    fn from(row: ImageJoinRow) -> Self {
        Self {
            product: ImageProductSummary {
                product_id: row.product_id.clone(),
                product_name: row.product_name,
            },
            image: ProductImage {
                image_id: row.image_id,
                product_id: row.product_id,
                image_url: row.image_url,
            },
        }
    }
}

/// DTO for recording a stored image.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductImage {
    pub product_id: String,
    pub image_url: String,
}

/// One page of images plus the total number of rows.
#[derive(Debug, Clone)]
pub struct ProductImagePage {
    pub items: Vec<ProductImageWithProduct>,
    pub total: i64,
}

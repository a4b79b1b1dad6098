//! Product details (one-to-one extended text for a product).

use catalog_core::types::deserialize_nullable;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `product_details` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct ProductDetails {
    pub product_id: String,
    pub product_description: String,
    pub directions: Option<String>,
}

/// The name and price of the product owning a details row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailsProductSummary {
    pub product_name: String,
    pub price: f64,
}

/// Details joined with their owning product's name and price.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductDetailsWithProduct {
    #[serde(flatten)]
    pub details: ProductDetails,
    pub product: DetailsProductSummary,
}

/// Flat row produced by the details/products join.
#[derive(Debug, FromRow)]
pub struct DetailsJoinRow {
    pub product_id: String,
    pub product_description: String,
    pub directions: Option<String>,
    pub product_name: String,
    pub price: f64,
}

impl From<DetailsJoinRow> for ProductDetailsWithProduct {
    fn from(row: DetailsJoinRow) -> Self {
        Self {
            details: ProductDetails {
                product_id: row.product_id,
                product_description: row.product_description,
                directions: row.directions,
            },
            product: DetailsProductSummary {
                product_name: row.product_name,
                price: row.price,
            },
        }
    }
}

/// DTO for creating details for an existing product.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductDetails {
    pub product_id: String,
    pub product_description: String,
    pub directions: Option<String>,
}

/// DTO for updating details. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProductDetails {
    pub product_description: Option<String>,
    /// `Some(None)` clears the directions; `None` leaves them untouched.
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub directions: Option<Option<String>>,
}

//! Product entity model, DTOs and the joined read shapes returned by the API.

use catalog_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::category::CategorySummary;
use super::product_details::ProductDetails;
use super::product_image::ProductImage;

/// A row from the `products` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Product {
    pub product_id: String,
    pub product_name: String,
    pub price: f64,
    pub in_stock: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A product with the categories it belongs to (returned on create).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductWithCategories {
    #[serde(flatten)]
    pub product: Product,
    pub categories: Vec<CategorySummary>,
}

/// A product with every association: categories, details and images.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductWithRelations {
    #[serde(flatten)]
    pub product: Product,
    pub categories: Vec<CategorySummary>,
    pub details: Option<ProductDetails>,
    pub images: Vec<ProductImage>,
}

/// A listing row: the product, its categories and at most one image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductListItem {
    #[serde(flatten)]
    pub product: Product,
    pub categories: Vec<CategorySummary>,
    pub images: Vec<ProductImage>,
}

/// One page of products plus the total number of matching rows.
#[derive(Debug, Clone)]
pub struct ProductPage {
    pub items: Vec<ProductListItem>,
    pub total: i64,
}

/// Junction row joined with the category name, used to group categories by product.
#[derive(Debug, FromRow)]
pub struct ProductCategoryRow {
    pub product_id: String,
    pub category_id: DbId,
    pub category_name: String,
}

/// DTO for creating a new product. The id is assigned by the repository.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProduct {
    pub product_name: String,
    pub price: f64,
    pub in_stock: i32,
    /// Category ids to associate; ids with no matching category are skipped.
    #[serde(default)]
    pub category_ids: Vec<DbId>,
}

/// DTO for updating an existing product. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProduct {
    pub product_name: Option<String>,
    pub price: Option<f64>,
    pub in_stock: Option<i32>,
    /// If `Some`, replaces all category associations. If `None`, leaves unchanged.
    pub category_ids: Option<Vec<DbId>>,
}

//! Repository for the `product_images` table.

use catalog_core::pagination;
use catalog_core::types::DbId;
use sqlx::PgPool;

use crate::models::product_image::{
    CreateProductImage, ImageJoinRow, ProductImage, ProductImagePage, ProductImageWithProduct,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "image_id, product_id, image_url";

/// Columns for the images/products join.
const JOIN_COLUMNS: &str = "i.image_id, i.product_id, i.image_url, p.product_name";

/// Provides CRUD operations for product image references.
pub struct ProductImageRepo;

impl ProductImageRepo {
    /// Record a stored image for a product, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateProductImage,
    ) -> Result<ProductImage, sqlx::Error> {
        let query = format!(
            "INSERT INTO product_images (product_id, image_url)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProductImage>(&query)
            .bind(&input.product_id)
            .bind(&input.image_url)
            .fetch_one(pool)
            .await
    }

    /// Find an image row by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ProductImage>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM product_images WHERE image_id = $1");
        sqlx::query_as::<_, ProductImage>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an image by ID, joined with its product's id and name.
    pub async fn find_with_product(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ProductImageWithProduct>, sqlx::Error> {
        let query = format!(
            "SELECT {JOIN_COLUMNS}
             FROM product_images i
             JOIN products p ON p.product_id = i.product_id
             WHERE i.image_id = $1"
        );
        let row = sqlx::query_as::<_, ImageJoinRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Into::into))
    }

    /// List one page of images ordered by ID, each with its product summary.
    pub async fn list(
        pool: &PgPool,
        page: i64,
        limit: i64,
    ) -> Result<ProductImagePage, sqlx::Error> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM product_images")
            .fetch_one(pool)
            .await?;

        let query = format!(
            "SELECT {JOIN_COLUMNS}
             FROM product_images i
             JOIN products p ON p.product_id = i.product_id
             ORDER BY i.image_id
             LIMIT $1 OFFSET $2"
        );
        let rows = sqlx::query_as::<_, ImageJoinRow>(&query)
            .bind(limit)
            .bind(pagination::offset(page, limit))
            .fetch_all(pool)
            .await?;

        Ok(ProductImagePage {
            items: rows.into_iter().map(Into::into).collect(),
            total,
        })
    }

    /// Public URLs of every image belonging to a product.
    pub async fn list_urls_for_product(
        pool: &PgPool,
        product_id: &str,
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT image_url FROM product_images WHERE product_id = $1 ORDER BY image_id",
        )
        .bind(product_id)
        .fetch_all(pool)
        .await
    }

    /// Delete an image row by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM product_images WHERE image_id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

//! Repository for the `product_details` table.

use sqlx::PgPool;

use crate::models::product_details::{
    CreateProductDetails, DetailsJoinRow, ProductDetails, ProductDetailsWithProduct,
    UpdateProductDetails,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "product_id, product_description, directions";

/// Columns for the details/products join.
const JOIN_COLUMNS: &str =
    "d.product_id, d.product_description, d.directions, p.product_name, p.price";

/// Provides CRUD operations for product details.
pub struct ProductDetailsRepo;

impl ProductDetailsRepo {
    /// Insert details for a product, returning the created row.
    ///
    /// The product must exist (foreign key); a second insert for the same
    /// product violates `uq_product_details_product_id`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateProductDetails,
    ) -> Result<ProductDetails, sqlx::Error> {
        let query = format!(
            "INSERT INTO product_details (product_id, product_description, directions)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProductDetails>(&query)
            .bind(&input.product_id)
            .bind(&input.product_description)
            .bind(&input.directions)
            .fetch_one(pool)
            .await
    }

    /// Find details by product ID, joined with the product's name and price.
    pub async fn find_by_product_id(
        pool: &PgPool,
        product_id: &str,
    ) -> Result<Option<ProductDetailsWithProduct>, sqlx::Error> {
        let query = format!(
            "SELECT {JOIN_COLUMNS}
             FROM product_details d
             JOIN products p ON p.product_id = d.product_id
             WHERE d.product_id = $1"
        );
        let row = sqlx::query_as::<_, DetailsJoinRow>(&query)
            .bind(product_id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Into::into))
    }

    /// List all details, joined with each product's name and price.
    pub async fn list(pool: &PgPool) -> Result<Vec<ProductDetailsWithProduct>, sqlx::Error> {
        let query = format!(
            "SELECT {JOIN_COLUMNS}
             FROM product_details d
             JOIN products p ON p.product_id = d.product_id
             ORDER BY length(d.product_id), d.product_id"
        );
        let rows = sqlx::query_as::<_, DetailsJoinRow>(&query)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Update details. Only non-`None` fields in `input` are applied;
    /// `directions: Some(None)` sets the column to NULL.
    ///
    /// Returns `None` if the product has no details row.
    pub async fn update(
        pool: &PgPool,
        product_id: &str,
        input: &UpdateProductDetails,
    ) -> Result<Option<ProductDetails>, sqlx::Error> {
        let query = format!(
            "UPDATE product_details SET
                product_description = COALESCE($2, product_description),
                directions = CASE WHEN $4 THEN $3 ELSE directions END
             WHERE product_id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProductDetails>(&query)
            .bind(product_id)
            .bind(&input.product_description)
            .bind(input.directions.as_ref().and_then(|d| d.as_deref()))
            .bind(input.directions.is_some())
            .fetch_optional(pool)
            .await
    }

    /// Delete the details of a product. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, product_id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM product_details WHERE product_id = $1")
            .bind(product_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

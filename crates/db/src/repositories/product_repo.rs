//! Repository for the `products` table and its `product_categories` junction.

use std::collections::HashMap;

use catalog_core::pagination;
use catalog_core::product_id::format_product_id;
use catalog_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::category::CategorySummary;
use crate::models::product::{
    CreateProduct, Product, ProductCategoryRow, ProductListItem, ProductPage,
    ProductWithCategories, ProductWithRelations, UpdateProduct,
};
use crate::models::product_details::ProductDetails;
use crate::models::product_image::ProductImage;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "product_id, product_name, price, in_stock, created_at, updated_at";

/// Same columns qualified with the `p` alias used in filtered listings.
const P_COLUMNS: &str =
    "p.product_id, p.product_name, p.price, p.in_stock, p.created_at, p.updated_at";

/// Optional category filter; `$1` is NULL when listing every product.
const CATEGORY_FILTER: &str = "($1::BIGINT IS NULL OR EXISTS (
        SELECT 1 FROM product_categories pc
        WHERE pc.product_id = p.product_id AND pc.category_id = $1))";

/// Provides CRUD operations for products and their category associations.
pub struct ProductRepo;

impl ProductRepo {
    /// Insert a new product and attach its categories in one transaction.
    ///
    /// The id is `P` + the zero-padded next value of `product_id_seq`.
    /// Category ids with no matching row are skipped.
    pub async fn create(
        pool: &PgPool,
        input: &CreateProduct,
    ) -> Result<ProductWithCategories, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let sequence: i64 = sqlx::query_scalar("SELECT nextval('product_id_seq')")
            .fetch_one(&mut *tx)
            .await?;
        let product_id = format_product_id(sequence);
        tracing::debug!(%product_id, sequence, "Allocated product id");

        let insert_query = format!(
            "INSERT INTO products (product_id, product_name, price, in_stock)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let product = sqlx::query_as::<_, Product>(&insert_query)
            .bind(&product_id)
            .bind(&input.product_name)
            .bind(input.price)
            .bind(input.in_stock)
            .fetch_one(&mut *tx)
            .await?;

        if !input.category_ids.is_empty() {
            Self::add_categories_inner(&mut tx, &product_id, &input.category_ids).await?;
        }

        let categories = Self::categories_for(&mut *tx, &product_id).await?;
        tx.commit().await?;

        Ok(ProductWithCategories {
            product,
            categories,
        })
    }

    /// Find a product row by ID.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products WHERE product_id = $1");
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Whether a product with this ID exists.
    pub async fn exists(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM products WHERE product_id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Find a product by ID, enriched with its categories, details and images.
    pub async fn find_with_relations(
        pool: &PgPool,
        id: &str,
    ) -> Result<Option<ProductWithRelations>, sqlx::Error> {
        let Some(product) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };

        let categories = Self::categories_for(pool, id).await?;

        let details = sqlx::query_as::<_, ProductDetails>(
            "SELECT product_id, product_description, directions
             FROM product_details WHERE product_id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        let images = sqlx::query_as::<_, ProductImage>(
            "SELECT image_id, product_id, image_url
             FROM product_images WHERE product_id = $1
             ORDER BY image_id",
        )
        .bind(id)
        .fetch_all(pool)
        .await?;

        Ok(Some(ProductWithRelations {
            product,
            categories,
            details,
            images,
        }))
    }

    /// List one page of products, optionally restricted to a category.
    ///
    /// Products are ordered by their numeric id. Each item carries all of
    /// its categories and at most one image (the oldest).
    pub async fn list(
        pool: &PgPool,
        page: i64,
        limit: i64,
        category_id: Option<DbId>,
    ) -> Result<ProductPage, sqlx::Error> {
        let count_query = format!("SELECT COUNT(*) FROM products p WHERE {CATEGORY_FILTER}");
        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(category_id)
            .fetch_one(pool)
            .await?;

        let page_query = format!(
            "SELECT {P_COLUMNS} FROM products p
             WHERE {CATEGORY_FILTER}
             ORDER BY length(p.product_id), p.product_id
             LIMIT $2 OFFSET $3"
        );
        let products = sqlx::query_as::<_, Product>(&page_query)
            .bind(category_id)
            .bind(limit)
            .bind(pagination::offset(page, limit))
            .fetch_all(pool)
            .await?;

        if products.is_empty() {
            return Ok(ProductPage {
                items: Vec::new(),
                total,
            });
        }

        let ids: Vec<String> = products.iter().map(|p| p.product_id.clone()).collect();

        let mut categories = Self::categories_by_product(pool, &ids).await?;

        let mut first_images: HashMap<String, ProductImage> =
            sqlx::query_as::<_, ProductImage>(
                "SELECT DISTINCT ON (product_id) image_id, product_id, image_url
                 FROM product_images
                 WHERE product_id = ANY($1)
                 ORDER BY product_id, image_id",
            )
            .bind(&ids)
            .fetch_all(pool)
            .await?
            .into_iter()
            .map(|img| (img.product_id.clone(), img))
            .collect();

        let items = products
            .into_iter()
            .map(|product| ProductListItem {
                categories: categories.remove(&product.product_id).unwrap_or_default(),
                images: first_images
                    .remove(&product.product_id)
                    .into_iter()
                    .collect(),
                product,
            })
            .collect();

        Ok(ProductPage { items, total })
    }

    /// Update a product. Only non-`None` fields in `input` are applied.
    ///
    /// If `category_ids` is `Some`, replaces all category associations in
    /// the same transaction. Returns `None` if no row with the given `id`
    /// exists; otherwise the refreshed product with every association.
    pub async fn update(
        pool: &PgPool,
        id: &str,
        input: &UpdateProduct,
    ) -> Result<Option<ProductWithRelations>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let update_query = format!(
            "UPDATE products SET
                product_name = COALESCE($2, product_name),
                price = COALESCE($3, price),
                in_stock = COALESCE($4, in_stock)
             WHERE product_id = $1
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Product>(&update_query)
            .bind(id)
            .bind(&input.product_name)
            .bind(input.price)
            .bind(input.in_stock)
            .fetch_optional(&mut *tx)
            .await?;

        if updated.is_none() {
            return Ok(None);
        }

        if let Some(ref category_ids) = input.category_ids {
            Self::set_categories_inner(&mut tx, id, category_ids).await?;
        }

        tx.commit().await?;
        Self::find_with_relations(pool, id).await
    }

    /// Delete a product by ID. Category links, details and image rows cascade.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM products WHERE product_id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Category association helpers
    // -----------------------------------------------------------------------

    /// Get the categories a product belongs to, ordered by category id.
    pub async fn categories_for<'e, E>(
        executor: E,
        product_id: &str,
    ) -> Result<Vec<CategorySummary>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, CategorySummary>(
            "SELECT c.category_id, c.category_name
             FROM categories c
             JOIN product_categories pc ON pc.category_id = c.category_id
             WHERE pc.product_id = $1
             ORDER BY c.category_id",
        )
        .bind(product_id)
        .fetch_all(executor)
        .await
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    /// Categories for several products at once, grouped by product id.
    async fn categories_by_product(
        pool: &PgPool,
        product_ids: &[String],
    ) -> Result<HashMap<String, Vec<CategorySummary>>, sqlx::Error> {
        let rows = sqlx::query_as::<_, ProductCategoryRow>(
            "SELECT pc.product_id, c.category_id, c.category_name
             FROM product_categories pc
             JOIN categories c ON c.category_id = pc.category_id
             WHERE pc.product_id = ANY($1)
             ORDER BY pc.product_id, c.category_id",
        )
        .bind(product_ids)
        .fetch_all(pool)
        .await?;

        let mut grouped: HashMap<String, Vec<CategorySummary>> = HashMap::new();
        for row in rows {
            grouped
                .entry(row.product_id)
                .or_default()
                .push(CategorySummary {
                    category_id: row.category_id,
                    category_name: row.category_name,
                });
        }
        Ok(grouped)
    }

    /// Link a product to every existing category among `category_ids`.
    async fn add_categories_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        product_id: &str,
        category_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO product_categories (product_id, category_id)
             SELECT $1, category_id FROM categories WHERE category_id = ANY($2)
             ON CONFLICT DO NOTHING",
        )
        .bind(product_id)
        .bind(category_ids)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Replace category associations within an existing transaction.
    async fn set_categories_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        product_id: &str,
        category_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM product_categories WHERE product_id = $1")
            .bind(product_id)
            .execute(&mut **tx)
            .await?;

        if !category_ids.is_empty() {
            Self::add_categories_inner(tx, product_id, category_ids).await?;
        }
        Ok(())
    }
}

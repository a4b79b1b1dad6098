//! Handlers for the `/products` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use catalog_core::error::CoreError;
use catalog_core::pagination::PageMeta;
use catalog_core::types::DbId;
use catalog_db::models::product::{
    CreateProduct, ProductWithCategories, ProductWithRelations, UpdateProduct,
};
use catalog_db::repositories::{ProductImageRepo, ProductRepo};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{AppPath, ValidatedJson, ValidatedQuery};
use crate::handlers::check_product_id;
use crate::query::ProductListParams;
use crate::response::{MessageResponse, ProductListResponse};
use crate::state::AppState;

const NAME_MESSAGE: &str = "Product name is required.";
const PRICE_MESSAGE: &str = "Price must be a number greater than 0.";
const STOCK_MESSAGE: &str = "In-stock quantity must be a non-negative integer.";

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(
        required(message = "Product name is required."),
        length(min = 1, message = "Product name is required.")
    )]
    pub product_name: Option<String>,
    #[validate(
        required(message = "Price must be a number greater than 0."),
        range(exclusive_min = 0.0, message = "Price must be a number greater than 0.")
    )]
    pub price: Option<f64>,
    #[validate(
        required(message = "In-stock quantity must be a non-negative integer."),
        range(min = 0, message = "In-stock quantity must be a non-negative integer.")
    )]
    pub in_stock: Option<i32>,
    pub category_ids: Option<Vec<DbId>>,
}

impl CreateProductRequest {
    fn into_input(self) -> AppResult<CreateProduct> {
        Ok(CreateProduct {
            product_name: self
                .product_name
                .ok_or_else(|| AppError::field("product_name", NAME_MESSAGE))?,
            price: self
                .price
                .ok_or_else(|| AppError::field("price", PRICE_MESSAGE))?,
            in_stock: self
                .in_stock
                .ok_or_else(|| AppError::field("in_stock", STOCK_MESSAGE))?,
            category_ids: self.category_ids.unwrap_or_default(),
        })
    }
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, message = "Product name must not be empty."))]
    pub product_name: Option<String>,
    #[validate(range(exclusive_min = 0.0, message = "Price must be a number greater than 0."))]
    pub price: Option<f64>,
    #[validate(range(min = 0, message = "In-stock quantity must be a non-negative integer."))]
    pub in_stock: Option<i32>,
    pub category_ids: Option<Vec<DbId>>,
}

impl From<UpdateProductRequest> for UpdateProduct {
    fn from(req: UpdateProductRequest) -> Self {
        UpdateProduct {
            product_name: req.product_name,
            price: req.price,
            in_stock: req.in_stock,
            category_ids: req.category_ids,
        }
    }
}

/// POST /api/products
pub async fn create(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateProductRequest>,
) -> AppResult<(StatusCode, Json<ProductWithCategories>)> {
    let input = input.into_input()?;
    let product = ProductRepo::create(&state.pool, &input).await?;
    tracing::info!(
        product_id = %product.product.product_id,
        categories = product.categories.len(),
        "Product created"
    );
    Ok((StatusCode::CREATED, Json(product)))
}

/// GET /api/products
pub async fn list(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<ProductListParams>,
) -> AppResult<Json<ProductListResponse>> {
    let (page, limit) = (params.page(), params.limit());
    let result = ProductRepo::list(&state.pool, page, limit, params.category_id).await?;
    Ok(Json(ProductListResponse {
        meta: PageMeta::new(page, limit, result.total),
        products: result.items,
    }))
}

/// GET /api/products/{id} and GET /api/products/{id}/details
pub async fn get_by_id(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
) -> AppResult<Json<ProductWithRelations>> {
    check_product_id("id", &id)?;
    let product = ProductRepo::find_with_relations(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Product", &id)))?;
    Ok(Json(product))
}

/// PUT /api/products/{id}
pub async fn update(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
    ValidatedJson(input): ValidatedJson<UpdateProductRequest>,
) -> AppResult<Json<ProductWithRelations>> {
    check_product_id("id", &id)?;
    let input = UpdateProduct::from(input);
    let product = ProductRepo::update(&state.pool, &id, &input)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Product", &id)))?;
    tracing::info!(product_id = %id, "Product updated");
    Ok(Json(product))
}

/// DELETE /api/products/{id}
///
/// Rows cascade in the database; the product's stored image files are
/// removed afterwards on a best-effort basis.
pub async fn delete(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
) -> AppResult<Json<MessageResponse>> {
    check_product_id("id", &id)?;
    let image_urls = ProductImageRepo::list_urls_for_product(&state.pool, &id).await?;

    if !ProductRepo::delete(&state.pool, &id).await? {
        return Err(AppError::Core(CoreError::not_found("Product", &id)));
    }
    tracing::info!(product_id = %id, images = image_urls.len(), "Product deleted");

    for url in &image_urls {
        if let Err(e) = state.images.remove(url).await {
            tracing::warn!(product_id = %id, image_url = %url, error = %e, "Orphaned image file");
        }
    }

    Ok(Json(MessageResponse::new("Product deleted successfully.")))
}

//! Handlers for the `/product-details` resource, keyed by product id.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use catalog_core::error::CoreError;
use catalog_core::types::deserialize_nullable;
use catalog_db::models::product_details::{
    CreateProductDetails, ProductDetails, ProductDetailsWithProduct, UpdateProductDetails,
};
use catalog_db::repositories::{ProductDetailsRepo, ProductRepo};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{AppPath, ValidatedJson};
use crate::handlers::check_product_id;
use crate::response::MessageResponse;
use crate::state::AppState;

const ENTITY: &str = "Product details";

#[derive(Debug, Deserialize, Validate)]
pub struct CreateDetailsRequest {
    #[validate(
        required(message = "Product ID must be in the format 'P001', 'P002', etc."),
        custom(function = "catalog_core::product_id::validate_product_id")
    )]
    pub product_id: Option<String>,
    #[validate(
        required(message = "Product description is required."),
        length(min = 1, message = "Product description is required.")
    )]
    pub product_description: Option<String>,
    pub directions: Option<String>,
}

impl From<CreateDetailsRequest> for CreateProductDetails {
    fn from(req: CreateDetailsRequest) -> Self {
        CreateProductDetails {
            product_id: req.product_id.unwrap_or_default(),
            product_description: req.product_description.unwrap_or_default(),
            directions: req.directions,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateDetailsRequest {
    #[validate(length(min = 1, message = "Product description must not be empty."))]
    pub product_description: Option<String>,
    /// `null` clears the directions.
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub directions: Option<Option<String>>,
}

impl From<UpdateDetailsRequest> for UpdateProductDetails {
    fn from(req: UpdateDetailsRequest) -> Self {
        UpdateProductDetails {
            product_description: req.product_description,
            directions: req.directions,
        }
    }
}

/// POST /api/product-details
pub async fn create(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateDetailsRequest>,
) -> AppResult<(StatusCode, Json<ProductDetails>)> {
    let input = CreateProductDetails::from(input);

    if !ProductRepo::exists(&state.pool, &input.product_id).await? {
        return Err(AppError::Core(CoreError::missing_reference(
            "Product",
            &input.product_id,
        )));
    }

    let details = ProductDetailsRepo::create(&state.pool, &input).await?;
    tracing::info!(product_id = %details.product_id, "Product details created");
    Ok((StatusCode::CREATED, Json(details)))
}

/// GET /api/product-details
pub async fn list(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ProductDetailsWithProduct>>> {
    let details = ProductDetailsRepo::list(&state.pool).await?;
    Ok(Json(details))
}

/// GET /api/product-details/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
) -> AppResult<Json<ProductDetailsWithProduct>> {
    check_product_id("id", &id)?;
    let details = ProductDetailsRepo::find_by_product_id(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found(ENTITY, &id)))?;
    Ok(Json(details))
}

/// PUT /api/product-details/{id}
pub async fn update(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
    ValidatedJson(input): ValidatedJson<UpdateDetailsRequest>,
) -> AppResult<Json<ProductDetails>> {
    check_product_id("id", &id)?;
    let input = UpdateProductDetails::from(input);
    let details = ProductDetailsRepo::update(&state.pool, &id, &input)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found(ENTITY, &id)))?;
    tracing::info!(product_id = %id, "Product details updated");
    Ok(Json(details))
}

/// DELETE /api/product-details/{id}
pub async fn delete(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
) -> AppResult<Json<MessageResponse>> {
    check_product_id("id", &id)?;
    if ProductDetailsRepo::delete(&state.pool, &id).await? {
        tracing::info!(product_id = %id, "Product details deleted");
        Ok(Json(MessageResponse::new(
            "Product details deleted successfully.",
        )))
    } else {
        Err(AppError::Core(CoreError::not_found(ENTITY, &id)))
    }
}

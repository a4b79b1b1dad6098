//! Handlers for the `/product-images` resource.

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::header::HOST;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use catalog_core::error::CoreError;
use catalog_core::image_store::image_extension;
use catalog_core::pagination::PageMeta;
use catalog_core::types::DbId;
use catalog_db::models::product_image::{CreateProductImage, ProductImageWithProduct};
use catalog_db::repositories::{ProductImageRepo, ProductRepo};

use crate::error::{AppError, AppResult};
use crate::extract::{AppPath, ValidatedQuery};
use crate::handlers::check_product_id;
use crate::query::PaginationParams;
use crate::response::{ImageListResponse, ImageUploadResponse, MessageResponse};
use crate::state::AppState;

const ENTITY: &str = "Image";

/// POST /api/product-images
///
/// Accepts a multipart form with a `product_id` text field and an `image`
/// file field. The file is stored first, then recorded; if the insert fails
/// the stored file is removed again.
pub async fn upload(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<(StatusCode, Json<ImageUploadResponse>)> {
    let mut multipart = multipart?;
    let mut product_id: Option<String> = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "product_id" => product_id = Some(field.text().await?),
            "image" => {
                let filename = field.file_name().unwrap_or("").to_string();
                let data = field.bytes().await?;
                file = Some((filename, data.to_vec()));
            }
            _ => {}
        }
    }

    let (Some(product_id), Some((filename, data))) = (product_id, file) else {
        return Err(AppError::BadRequest(
            "Product ID and image file are required.".into(),
        ));
    };

    check_product_id("product_id", &product_id)?;
    let ext = image_extension(&filename)?;

    if !ProductRepo::exists(&state.pool, &product_id).await? {
        return Err(AppError::Core(CoreError::missing_reference(
            "Product",
            &product_id,
        )));
    }

    let stored = state.images.save(&ext, &data).await?;
    let input = CreateProductImage {
        product_id,
        image_url: stored.image_url.clone(),
    };
    let image = match ProductImageRepo::create(&state.pool, &input).await {
        Ok(image) => image,
        Err(e) => {
            if let Err(cleanup) = state.images.remove(&stored.image_url).await {
                tracing::warn!(image_url = %stored.image_url, error = %cleanup, "Orphaned image file");
            }
            return Err(e.into());
        }
    };

    tracing::info!(
        image_id = image.image_id,
        product_id = %image.product_id,
        bytes = data.len(),
        "Image uploaded"
    );

    Ok((
        StatusCode::CREATED,
        Json(ImageUploadResponse {
            message: "Image uploaded successfully".to_string(),
            image_url: absolute_url(&headers, &stored.image_url),
            image,
        }),
    ))
}

/// GET /api/product-images
pub async fn list(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<PaginationParams>,
) -> AppResult<Json<ImageListResponse>> {
    let (page, limit) = (params.page(), params.limit());
    let result = ProductImageRepo::list(&state.pool, page, limit).await?;
    Ok(Json(ImageListResponse {
        meta: PageMeta::new(page, limit, result.total),
        images: result.items,
    }))
}

/// GET /api/product-images/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<ProductImageWithProduct>> {
    let image = ProductImageRepo::find_with_product(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found(ENTITY, id)))?;
    Ok(Json(image))
}

/// DELETE /api/product-images/{id}
///
/// Removes the stored file, then the row. A failed file removal aborts the
/// deletion and leaves the row in place.
pub async fn delete(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<MessageResponse>> {
    let image = ProductImageRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found(ENTITY, id)))?;

    state.images.remove(&image.image_url).await?;

    if !ProductImageRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::not_found(ENTITY, id)));
    }
    tracing::info!(image_id = id, product_id = %image.product_id, "Image deleted");
    Ok(Json(MessageResponse::new("Image deleted successfully.")))
}

/// Absolute URL of a stored file as seen by the requesting client.
fn absolute_url(headers: &HeaderMap, path: &str) -> String {
    let host = headers
        .get(HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost");
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("http");
    format!("{scheme}://{host}{path}")
}

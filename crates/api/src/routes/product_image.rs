//! Route definitions for the `/product-images` resource.

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;

use crate::handlers::product_image;
use crate::state::AppState;

/// Routes mounted at `/product-images`.
///
/// ```text
/// GET    /         -> list
/// POST   /         -> upload (multipart, body limit from config)
/// GET    /{id}     -> get_by_id
/// DELETE /{id}     -> delete
/// ```
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(product_image::list)
                .post(product_image::upload)
                .layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route(
            "/{id}",
            get(product_image::get_by_id).delete(product_image::delete),
        )
}

pub mod category;
pub mod health;
pub mod product;
pub mod product_details;
pub mod product_image;

use axum::Router;

use crate::config::ServerConfig;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /categories                  list, create
/// /categories/{id}             get, update, delete
///
/// /products                    list (paginated, ?category_id=), create
/// /products/{id}               get, update, delete
/// /products/{id}/details       get with categories, details and images
///
/// /product-details             list, create
/// /product-details/{id}        get, update, delete (keyed by product id)
///
/// /product-images              list (paginated), upload (multipart)
/// /product-images/{id}         get, delete
/// ```
pub fn api_routes(config: &ServerConfig) -> Router<AppState> {
    Router::new()
        .nest("/categories", category::router())
        .nest("/products", product::router())
        .nest("/product-details", product_details::router())
        .nest("/product-images", product_image::router(config.max_upload_bytes))
}

//! Route definitions for the `/product-details` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::product_details;
use crate::state::AppState;

/// Routes mounted at `/product-details`.
///
/// ```text
/// GET    /         -> list
/// POST   /         -> create
/// GET    /{id}     -> get_by_id
/// PUT    /{id}     -> update
/// DELETE /{id}     -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(product_details::list).post(product_details::create))
        .route(
            "/{id}",
            get(product_details::get_by_id)
                .put(product_details::update)
                .delete(product_details::delete),
        )
}

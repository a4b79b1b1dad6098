#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use catalog_api::config::ServerConfig;
use catalog_api::router::build_app_router;
use catalog_api::state::AppState;
use catalog_core::image_store::{DiskImageStore, MemoryImageStore};

/// Host header sent with uploads so absolute image URLs are predictable.
pub const TEST_HOST: &str = "catalog.test";

const BOUNDARY: &str = "catalog-test-boundary";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3001".to_string()],
        request_timeout_secs: 30,
        upload_dir: PathBuf::from("uploads"),
        max_upload_bytes: 1024 * 1024,
    }
}

/// Build the full application router over `pool`, storing images in memory.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_store(pool, Arc::new(MemoryImageStore::new()))
}

/// Same as [`build_test_app`] but with a store the test can inspect.
pub fn build_test_app_with_store(pool: PgPool, images: Arc<MemoryImageStore>) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        images,
    };
    build_app_router(state, &config)
}

/// Build the application over a real upload directory, as production does.
pub fn build_disk_test_app(pool: PgPool, upload_dir: &Path) -> Router {
    let config = ServerConfig {
        upload_dir: upload_dir.to_path_buf(),
        ..test_config()
    };
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        images: Arc::new(DiskImageStore::new(upload_dir)),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send_json(app, Method::POST, uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send_json(app, Method::PUT, uri, body).await
}

async fn send_json(app: Router, method: Method, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// POST a multipart form with an optional `product_id` text field and an
/// optional `image` file field.
pub async fn post_image(
    app: Router,
    product_id: Option<&str>,
    image: Option<(&str, &[u8])>,
) -> Response {
    let mut body: Vec<u8> = Vec::new();
    if let Some(id) = product_id {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"product_id\"\r\n\r\n{id}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((filename, data)) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/product-images")
        .header(header::HOST, TEST_HOST)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Create a category through the API and return its id.
pub async fn create_category(app: Router, name: &str) -> i64 {
    let response = post_json(
        app,
        "/api/categories",
        serde_json::json!({ "category_name": name }),
    )
    .await;
    assert_eq!(response.status(), 201);
    body_json(response).await["category_id"].as_i64().unwrap()
}

/// Create a product through the API and return its id.
pub async fn create_product(app: Router, name: &str, category_ids: &[i64]) -> String {
    let response = post_json(
        app,
        "/api/products",
        serde_json::json!({
            "product_name": name,
            "price": 9.99,
            "in_stock": 5,
            "category_ids": category_ids,
        }),
    )
    .await;
    assert_eq!(response.status(), 201);
    body_json(response).await["product_id"]
        .as_str()
        .unwrap()
        .to_string()
}

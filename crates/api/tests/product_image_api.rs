//! HTTP integration tests for `/api/product-images`.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::Router;
use catalog_core::image_store::{filename_from_url, MemoryImageStore};
use common::{body_json, create_product, delete, get, post_image, TEST_HOST};
use http_body_util::BodyExt;
use serde_json::json;
use sqlx::PgPool;

const PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake";

/// Upload `filename` for `product_id` and return the created body.
async fn upload(app: Router, product_id: &str, filename: &str) -> serde_json::Value {
    let response = post_image(app, Some(product_id), Some((filename, PNG))).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Upload
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn upload_stores_file_and_row(pool: PgPool) {
    let store = Arc::new(MemoryImageStore::new());
    let app = common::build_test_app_with_store(pool, Arc::clone(&store));
    let id = create_product(app.clone(), "Soap", &[]).await;

    let response = post_image(app.clone(), Some(id.as_str()), Some(("soap.PNG", PNG))).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["message"], "Image uploaded successfully");
    assert_eq!(json["image"]["product_id"], id.as_str());

    let image_url = json["image"]["image_url"].as_str().unwrap();
    assert!(image_url.starts_with("/uploads/images/"));
    assert!(image_url.ends_with(".png"));
    assert_eq!(json["imageUrl"], format!("http://{TEST_HOST}{image_url}"));

    let filename = filename_from_url(image_url).unwrap();
    assert!(store.contains(filename));

    let product = body_json(get(app, &format!("/api/products/{id}")).await).await;
    assert_eq!(product["images"][0]["image_url"], image_url);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn upload_without_file_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let id = create_product(app.clone(), "Soap", &[]).await;

    let response = post_image(app.clone(), Some(id.as_str()), None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "Product ID and image file are required."
    );

    let response = post_image(app, None, Some(("a.png", PNG))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn upload_with_malformed_product_id_returns_400(pool: PgPool) {
    let store = Arc::new(MemoryImageStore::new());
    let app = common::build_test_app_with_store(pool, Arc::clone(&store));

    let response = post_image(app, Some("12"), Some(("a.png", PNG))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["errors"][0]["field"], "product_id");
    assert!(store.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn upload_with_unsupported_extension_returns_400(pool: PgPool) {
    let store = Arc::new(MemoryImageStore::new());
    let app = common::build_test_app_with_store(pool, Arc::clone(&store));
    let id = create_product(app.clone(), "Soap", &[]).await;

    let response = post_image(
        app,
        Some(id.as_str()),
        Some(("notes.txt", b"hello".as_slice())),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    assert!(store.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn upload_for_missing_product_returns_404(pool: PgPool) {
    let store = Arc::new(MemoryImageStore::new());
    let app = common::build_test_app_with_store(pool, Arc::clone(&store));

    let response = post_image(app, Some("P404"), Some(("a.jpg", PNG))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "MISSING_REFERENCE");
    assert!(store.is_empty());
}

// ---------------------------------------------------------------------------
// Read
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn get_image_includes_product_summary(pool: PgPool) {
    let app = common::build_test_app(pool);
    let id = create_product(app.clone(), "Soap", &[]).await;
    let uploaded = upload(app.clone(), &id, "a.jpg").await;
    let image_id = uploaded["image"]["image_id"].as_i64().unwrap();

    let response = get(app, &format!("/api/product-images/{image_id}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["image_id"], image_id);
    assert_eq!(
        json["product"],
        json!({ "product_id": id, "product_name": "Soap" })
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn get_missing_image_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app, "/api/product-images/31337").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["message"], "Image not found.");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_images_paginates(pool: PgPool) {
    let app = common::build_test_app(pool);
    let id = create_product(app.clone(), "Soap", &[]).await;
    for name in ["a.png", "b.png", "c.png"] {
        upload(app.clone(), &id, name).await;
    }

    let response = get(app, "/api/product-images?page=2&limit=2").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["currentPage"], 2);
    assert_eq!(json["totalPages"], 2);
    assert_eq!(json["totalItems"], 3);
    assert_eq!(json["itemsPerPage"], 2);
    let images = json["images"].as_array().unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0]["product"]["product_name"], "Soap");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn product_list_shows_one_image(pool: PgPool) {
    let app = common::build_test_app(pool);
    let id = create_product(app.clone(), "Soap", &[]).await;
    let first = upload(app.clone(), &id, "a.png").await;
    upload(app.clone(), &id, "b.png").await;

    let json = body_json(get(app, "/api/products").await).await;
    let images = json["products"][0]["images"].as_array().unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0]["image_id"], first["image"]["image_id"]);
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_image_removes_file_and_row(pool: PgPool) {
    let store = Arc::new(MemoryImageStore::new());
    let app = common::build_test_app_with_store(pool, Arc::clone(&store));
    let id = create_product(app.clone(), "Soap", &[]).await;
    let uploaded = upload(app.clone(), &id, "a.png").await;
    let image_id = uploaded["image"]["image_id"].as_i64().unwrap();

    let response = delete(app.clone(), &format!("/api/product-images/{image_id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["message"],
        "Image deleted successfully."
    );
    assert!(store.is_empty());

    let response = get(app, &format!("/api/product-images/{image_id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_missing_image_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = delete(app, "/api/product-images/5").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn failed_file_removal_keeps_row(pool: PgPool) {
    let store = Arc::new(MemoryImageStore::new());
    let app = common::build_test_app_with_store(pool, Arc::clone(&store));
    let id = create_product(app.clone(), "Soap", &[]).await;
    let uploaded = upload(app.clone(), &id, "a.png").await;
    let image_id = uploaded["image"]["image_id"].as_i64().unwrap();
    let filename = filename_from_url(uploaded["image"]["image_url"].as_str().unwrap())
        .unwrap()
        .to_string();
    assert!(store.evict(&filename));

    let response = delete(app.clone(), &format!("/api/product-images/{image_id}")).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert_eq!(json["code"], "STORAGE_ERROR");
    assert_eq!(json["message"], "Failed to delete image file.");

    let response = get(app, &format!("/api/product-images/{image_id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_product_removes_its_files(pool: PgPool) {
    let store = Arc::new(MemoryImageStore::new());
    let app = common::build_test_app_with_store(pool, Arc::clone(&store));
    let id = create_product(app.clone(), "Soap", &[]).await;
    upload(app.clone(), &id, "a.png").await;
    upload(app.clone(), &id, "b.webp").await;
    assert_eq!(store.len(), 2);

    let response = delete(app.clone(), &format!("/api/products/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(store.is_empty());

    let json = body_json(get(app, "/api/product-images").await).await;
    assert_eq!(json["totalItems"], 0);
}

// ---------------------------------------------------------------------------
// Disk storage
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn uploaded_file_is_served_and_deleted_from_disk(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_disk_test_app(pool, dir.path());
    let id = create_product(app.clone(), "Soap", &[]).await;

    let uploaded = upload(app.clone(), &id, "photo.png").await;
    let image_url = uploaded["image"]["image_url"].as_str().unwrap().to_string();
    let image_id = uploaded["image"]["image_id"].as_i64().unwrap();
    let path = dir
        .path()
        .join("images")
        .join(filename_from_url(&image_url).unwrap());
    assert!(path.exists());

    let response = get(app.clone(), &image_url).await;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], PNG);

    let response = delete(app, &format!("/api/product-images/{image_id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!path.exists());
}

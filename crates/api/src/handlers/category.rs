//! Handlers for the `/categories` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use catalog_core::error::CoreError;
use catalog_core::types::DbId;
use catalog_db::models::category::{Category, CreateCategory, UpdateCategory};
use catalog_db::repositories::CategoryRepo;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{AppPath, ValidatedJson};
use crate::response::MessageResponse;
use crate::state::AppState;

/// Body accepted by both create and update.
#[derive(Debug, Deserialize, Validate)]
pub struct CategoryRequest {
    #[validate(
        required(message = "Category name is required."),
        length(min = 1, message = "Category name is required.")
    )]
    pub category_name: Option<String>,
}

impl CategoryRequest {
    fn into_name(self) -> String {
        self.category_name.unwrap_or_default()
    }
}

/// POST /api/categories
pub async fn create(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CategoryRequest>,
) -> AppResult<(StatusCode, Json<Category>)> {
    let input = CreateCategory {
        category_name: input.into_name(),
    };
    let category = CategoryRepo::create(&state.pool, &input).await?;
    tracing::info!(category_id = category.category_id, "Category created");
    Ok((StatusCode::CREATED, Json(category)))
}

/// GET /api/categories
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Category>>> {
    let categories = CategoryRepo::list(&state.pool).await?;
    Ok(Json(categories))
}

/// GET /api/categories/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<Category>> {
    let category = CategoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Category", id)))?;
    Ok(Json(category))
}

/// PUT /api/categories/{id}
pub async fn update(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    ValidatedJson(input): ValidatedJson<CategoryRequest>,
) -> AppResult<Json<Category>> {
    let input = UpdateCategory {
        category_name: input.into_name(),
    };
    let category = CategoryRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Category", id)))?;
    tracing::info!(category_id = id, "Category updated");
    Ok(Json(category))
}

/// DELETE /api/categories/{id}
pub async fn delete(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<MessageResponse>> {
    let deleted = CategoryRepo::delete(&state.pool, id).await?;
    if deleted {
        tracing::info!(category_id = id, "Category deleted");
        Ok(Json(MessageResponse::new("Category deleted successfully.")))
    } else {
        Err(AppError::Core(CoreError::not_found("Category", id)))
    }
}

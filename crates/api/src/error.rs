use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use catalog_core::error::CoreError;
use catalog_core::product_id::PRODUCT_ID_FORMAT_MESSAGE;
use serde::Serialize;
use serde_json::json;
use validator::ValidationErrors;

/// Message attached to every field-level validation failure.
pub const VALIDATION_MESSAGE: &str = "Missing required fields.";

/// Sanitized message for anything that ends up as a 500.
pub const INTERNAL_MESSAGE: &str = "An unexpected error occurred.";

/// One rejected request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `catalog_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    /// One or more request fields failed validation.
    #[error("Validation failed on {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Shorthand for a single rejected field.
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Validation(vec![FieldError::new(field, message)])
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, .. } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} not found."),
                ),
                CoreError::MissingReference { entity, .. } => (
                    StatusCode::NOT_FOUND,
                    "MISSING_REFERENCE",
                    format!("{entity} not found."),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Storage(msg) => {
                    tracing::error!(error = %msg, "Storage error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "STORAGE_ERROR",
                        msg.clone(),
                    )
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- HTTP-specific errors ---
            AppError::Validation(errors) => {
                let body = json!({
                    "message": VALIDATION_MESSAGE,
                    "code": "VALIDATION_ERROR",
                    "errors": errors,
                });
                return (StatusCode::BAD_REQUEST, axum::Json(body)).into_response();
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "message": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Foreign key violations map to 404 `MISSING_REFERENCE`.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found.".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // Foreign key violation: the referenced parent vanished mid-request.
            if db_err.code().as_deref() == Some("23503") {
                return (
                    StatusCode::NOT_FOUND,
                    "MISSING_REFERENCE",
                    "Referenced record not found.".to_string(),
                );
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                INTERNAL_MESSAGE.to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                INTERNAL_MESSAGE.to_string(),
            )
        }
    }
}

/// Unique constraint violations (constraint name starting with `uq_`) become
/// [`CoreError::Conflict`]; everything else stays a database error.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                if let Some(constraint) = db_err.constraint().filter(|c| c.starts_with("uq_")) {
                    return AppError::Core(CoreError::Conflict(conflict_message(constraint)));
                }
            }
        }
        AppError::Database(err)
    }
}

fn conflict_message(constraint: &str) -> String {
    match constraint {
        "uq_categories_category_name" => "Category name already exists.".to_string(),
        "uq_product_details_product_id" => {
            "Product details already exist for this product.".to_string()
        }
        other => format!("Duplicate value violates unique constraint: {other}"),
    }
}

// ---------------------------------------------------------------------------
// Extractor rejections
// ---------------------------------------------------------------------------

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                let field = field.to_string();
                errs.iter().map(move |e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string());
                    FieldError::new(field.clone(), message)
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        AppError::Validation(fields)
    }
}

/// Prefix axum puts in front of the `path: error` text of a typed body failure.
const JSON_DATA_PREFIX: &str = "Failed to deserialize the JSON body into the target type: ";

/// A body that parsed as JSON but has a field of the wrong type is reported
/// like any other field violation. Syntax errors stay `BAD_REQUEST`.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let text = rejection.body_text();
        if let JsonRejection::JsonDataError(_) = rejection {
            if let Some(field) = field_type_error(&text) {
                return AppError::Validation(vec![field]);
            }
        }
        AppError::BadRequest(text)
    }
}

/// Recover the offending field from a `path: error` deserializer message.
fn field_type_error(text: &str) -> Option<FieldError> {
    let (path, detail) = text.strip_prefix(JSON_DATA_PREFIX)?.split_once(": ")?;
    let field = path.split(['[', '.']).next().filter(|f| !f.is_empty())?;
    let message = type_message(field, path.contains('['))
        .map(str::to_string)
        .unwrap_or_else(|| detail.to_string());
    Some(FieldError::new(field, message))
}

/// Wrong-type messages for known request fields. `element` is set when the
/// failure is inside an array.
fn type_message(field: &str, element: bool) -> Option<&'static str> {
    let message = match field {
        "category_name" => "Category name must be a string.",
        "product_name" => "Product name must be a string.",
        "price" => "Price must be a number greater than 0.",
        "in_stock" => "In-stock quantity must be a non-negative integer.",
        "category_ids" if element => "Category IDs array must contain only numbers.",
        "category_ids" => "Category IDs must be an array of numbers.",
        "product_id" => PRODUCT_ID_FORMAT_MESSAGE,
        "product_description" => "Product description must be a string.",
        "directions" => "Directions must be a string.",
        _ => return None,
    };
    Some(message)
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::BadRequest(err.body_text())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use validator::Validate;

    use super::*;

    #[derive(Validate)]
    struct Probe {
        #[validate(length(min = 1, message = "Name is required."))]
        name: String,
        #[validate(range(min = 1, message = "Page must be a positive integer."))]
        page: i64,
    }

    #[test]
    fn validation_errors_become_sorted_field_errors() {
        let probe = Probe {
            name: String::new(),
            page: 0,
        };
        let err: AppError = probe.validate().unwrap_err().into();

        assert_matches!(err, AppError::Validation(fields) => {
            assert_eq!(
                fields,
                vec![
                    FieldError::new("name", "Name is required."),
                    FieldError::new("page", "Page must be a positive integer."),
                ]
            );
        });
    }

    #[test]
    fn status_codes_follow_error_kind() {
        let cases = [
            (AppError::Core(CoreError::not_found("Category", 1)), StatusCode::NOT_FOUND),
            (
                AppError::Core(CoreError::missing_reference("Product", "P001")),
                StatusCode::NOT_FOUND,
            ),
            (AppError::field("price", "bad"), StatusCode::BAD_REQUEST),
            (AppError::BadRequest("bad".into()), StatusCode::BAD_REQUEST),
            (
                AppError::Core(CoreError::Conflict("dup".into())),
                StatusCode::CONFLICT,
            ),
            (
                AppError::Core(CoreError::Storage("gone".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::Database(sqlx::Error::PoolTimedOut),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn wrong_typed_fields_become_field_errors() {
        let text = format!(
            "{JSON_DATA_PREFIX}price: invalid type: string \"abc\", expected f64 at line 1 column 14"
        );
        assert_eq!(
            field_type_error(&text),
            Some(FieldError::new("price", "Price must be a number greater than 0."))
        );

        let text =
            format!("{JSON_DATA_PREFIX}category_ids[1]: invalid type: string \"a\", expected i64");
        assert_eq!(
            field_type_error(&text),
            Some(FieldError::new(
                "category_ids",
                "Category IDs array must contain only numbers."
            ))
        );
    }

    #[test]
    fn unknown_fields_keep_deserializer_detail() {
        let text = format!("{JSON_DATA_PREFIX}extra: invalid type: map, expected a string");
        assert_eq!(
            field_type_error(&text),
            Some(FieldError::new("extra", "invalid type: map, expected a string"))
        );
    }

    #[test]
    fn whole_body_type_errors_have_no_field() {
        let text = format!("{JSON_DATA_PREFIX}.: invalid type: sequence, expected struct");
        assert_eq!(field_type_error(&text), None);
        assert_eq!(field_type_error("Failed to parse the request body as JSON"), None);
    }

    #[test]
    fn known_constraints_get_readable_conflict_messages() {
        assert_eq!(
            conflict_message("uq_categories_category_name"),
            "Category name already exists."
        );
        assert!(conflict_message("uq_other").contains("uq_other"));
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    /// A write referenced a parent row that does not exist
    /// (e.g. details for an unknown product).
    #[error("Missing reference: {entity} with id {id}")]
    MissingReference { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl CoreError {
    /// Shorthand for [`CoreError::NotFound`] with any displayable id.
    pub fn not_found(entity: &'static str, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Shorthand for [`CoreError::MissingReference`] with any displayable id.
    pub fn missing_reference(entity: &'static str, id: impl std::fmt::Display) -> Self {
        Self::MissingReference {
            entity,
            id: id.to_string(),
        }
    }
}

use thiserror::Error;

/// Errors surfaced by the document store and its query layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The supplied identifier is not a well-formed document id.
    /// Distinct from a lookup that simply matches nothing.
    #[error("invalid identifier '{0}'")]
    InvalidId(String),

    /// Required fields were missing or empty.
    #[error("validation failed for fields: {}", fields.join(", "))]
    Validation { fields: Vec<String> },

    /// A pagination parameter was out of range.
    #[error("invalid pagination parameter: {0}")]
    InvalidPagination(String),

    #[error("document serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

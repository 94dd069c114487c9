use axum::http::StatusCode;
use noted_core::StoreError;
use thiserror::Error;

/// Errors that can stop the server from starting or serving.
#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("Missing environment variable {1}: {0}")]
    EnvError(std::env::VarError, String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot serve: {0}")]
    CannotServe(std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Request-level failures, each mapping to one client-visible status code.
/// `Internal` keeps its detail for the logs; clients only ever see the
/// generic message.
#[derive(Debug, Error)]
pub enum RestError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    InvalidId(String),

    #[error("{0}")]
    Internal(String),
}

impl RestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RestError::NotFound(_) => StatusCode::NOT_FOUND,
            RestError::Validation(_) | RestError::InvalidId(_) => StatusCode::BAD_REQUEST,
            RestError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to place in a client-facing envelope.
    pub fn client_message(&self) -> String {
        match self {
            RestError::Internal(_) => "An unexpected error occurred".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<StoreError> for RestError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidId(id) => RestError::InvalidId(format!("Invalid ID '{}'", id)),
            StoreError::Validation { fields } => RestError::Validation(format!(
                "Validation failed for fields: {}",
                fields.join(", ")
            )),
            StoreError::InvalidPagination(msg) => {
                RestError::Validation(format!("Invalid pagination parameter: {}", msg))
            }
            other => RestError::Internal(other.to_string()),
        }
    }
}

pub type RestResult<T> = Result<T, RestError>;

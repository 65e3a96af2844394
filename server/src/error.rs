//! Store and HTTP error types.
//!
//! `StoreError` is what `TodoStore` returns. `AppError` is what handlers
//! return; it renders as a bare status code for misses and as a short text
//! body otherwise.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No row with this id.
    #[error("todo {0} not found")]
    NotFound(i64),

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Only raised when the server runs with `strict_status`.
    #[error("unknown status {0:?}, expected one of pending, in-progress, complete")]
    UnknownStatus(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Store(StoreError::NotFound(id)) => {
                tracing::debug!(id, "todo not found");
                StatusCode::NOT_FOUND.into_response()
            }
            AppError::Store(StoreError::Sqlite(err)) => {
                tracing::error!("store failure: {err}");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
            }
            err @ AppError::UnknownStatus(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()).into_response()
            }
        }
    }
}

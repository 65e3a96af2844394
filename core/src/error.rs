//! Error types for the todo API client.
//!
//! # Design
//! `NotFound` is only produced by the single-todo fetch, so callers can tell
//! "this todo does not exist" apart from every other failure without looking
//! at status codes. Everything else that goes wrong on the wire is a
//! `Request` error naming the operation that failed. Payloads that arrive but
//! do not match the expected shape are `Validation` errors; forms rejected
//! before anything is sent are `InvalidForm`.

use std::fmt;

/// The client operation an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    FetchTodo,
    FetchTodos,
    FetchCompleted,
    Create,
    Update,
    Remove,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::FetchTodo => "fetch todo",
            Operation::FetchTodos => "fetch todos",
            Operation::FetchCompleted => "fetch completed todos",
            Operation::Create => "create todo",
            Operation::Update => "update todo",
            Operation::Remove => "remove todo",
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server returned 404 for a single-todo fetch.
    #[error("todo with id {0:?} not found")]
    NotFound(String),

    /// Transport failure or a non-2xx response.
    #[error("failed to {operation}: {message}")]
    Request {
        operation: Operation,
        /// `None` when no response was received at all.
        status: Option<u16>,
        message: String,
    },

    /// The response body did not have the expected shape.
    #[error("invalid data received from API: {0}")]
    Validation(String),

    /// A form failed validation before any request was built.
    #[error("invalid {field}: {message}")]
    InvalidForm { field: &'static str, message: String },

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }
}

/// A status string outside pending / in-progress / complete.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown status {0:?}")]
pub struct UnknownStatus(pub String);

/// The request never produced a response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct TransportError(pub String);

//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only a `base_url`. Each operation is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes the matching `HttpResponse`. Any 2xx status counts as
//! success. Every todo that comes back is validated before it is returned.
//! Ids are checked before they reach a URL: only the string form of an
//! integer names a todo, and the path is rebuilt from the parsed value.

use crate::error::{ApiError, Operation};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Todo, TodoForm, WireTodo};

#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_todos(&self) -> HttpRequest {
        tracing::info!("fetching todos");
        self.request(HttpMethod::Get, "/todo".to_string(), None)
    }

    pub fn build_list_completed(&self) -> HttpRequest {
        tracing::info!("fetching completed todos");
        self.request(HttpMethod::Get, "/todo/complete".to_string(), None)
    }

    /// An id that is not an integer cannot exist, so it is `NotFound`
    /// without a request being built.
    pub fn build_get_todo(&self, id: &str) -> Result<HttpRequest, ApiError> {
        tracing::info!(id, "fetching todo");
        let id = todo_id(id).ok_or_else(|| ApiError::NotFound(id.to_string()))?;
        Ok(self.request(HttpMethod::Get, format!("/todo/{id}"), None))
    }

    pub fn build_create_todo(&self, form: &TodoForm) -> Result<HttpRequest, ApiError> {
        tracing::info!("creating todo");
        let body = encode(form)?;
        Ok(self.request(HttpMethod::Post, "/todo".to_string(), Some(body)))
    }

    /// The form replaces every field of the stored todo, including ones left
    /// as `None`.
    pub fn build_update_todo(&self, id: &str, form: &TodoForm) -> Result<HttpRequest, ApiError> {
        tracing::info!(id, "updating todo");
        let id = todo_id(id).ok_or_else(|| invalid_id(id))?;
        let body = encode(form)?;
        Ok(self.request(HttpMethod::Put, format!("/todo/{id}"), Some(body)))
    }

    pub fn build_remove_todo(&self, id: &str) -> Result<HttpRequest, ApiError> {
        tracing::info!(id, "removing todo");
        let id = todo_id(id).ok_or_else(|| invalid_id(id))?;
        Ok(self.request(HttpMethod::Delete, format!("/todo/{id}"), None))
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        expect_success(&response, Operation::FetchTodos)?;
        decode_list(&response.body)
    }

    pub fn parse_list_completed(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        expect_success(&response, Operation::FetchCompleted)?;
        decode_list(&response.body)
    }

    /// A 404 here becomes `ApiError::NotFound(id)`.
    pub fn parse_get_todo(&self, id: &str, response: HttpResponse) -> Result<Todo, ApiError> {
        if response.status == 404 {
            return Err(ApiError::NotFound(id.to_string()));
        }
        expect_success(&response, Operation::FetchTodo)?;
        decode_one(&response.body)
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        expect_success(&response, Operation::Create)?;
        let todo = decode_one(&response.body)?;
        tracing::info!(id = %todo.id, location = response.header("location"), "created todo");
        Ok(todo)
    }

    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<(), ApiError> {
        expect_success(&response, Operation::Update)
    }

    pub fn parse_remove_todo(&self, response: HttpResponse) -> Result<(), ApiError> {
        expect_success(&response, Operation::Remove)
    }

    fn request(&self, method: HttpMethod, path: String, body: Option<String>) -> HttpRequest {
        let headers = match body {
            Some(_) => vec![("content-type".to_string(), "application/json".to_string())],
            None => Vec::new(),
        };
        HttpRequest {
            method,
            url: format!("{}{path}", self.base_url),
            headers,
            body,
        }
    }
}

/// The server's integer id behind a client-side id string.
pub fn todo_id(id: &str) -> Option<i64> {
    id.parse().ok()
}

fn invalid_id(id: &str) -> ApiError {
    ApiError::InvalidForm {
        field: "id",
        message: format!("{id:?} is not a todo id"),
    }
}

fn encode(form: &TodoForm) -> Result<String, ApiError> {
    form.validate()?;
    serde_json::to_string(form).map_err(|e| ApiError::Serialization(e.to_string()))
}

/// Map any non-2xx status to a `Request` error for `operation`.
fn expect_success(response: &HttpResponse, operation: Operation) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    let message = if response.body.is_empty() {
        format!("HTTP {}", response.status)
    } else {
        format!("HTTP {}: {}", response.status, response.body)
    };
    Err(ApiError::Request {
        operation,
        status: Some(response.status),
        message,
    })
}

fn decode_one(body: &str) -> Result<Todo, ApiError> {
    let wire: WireTodo = serde_json::from_str(body).map_err(invalid)?;
    wire.validate().inspect_err(log_invalid)
}

fn decode_list(body: &str) -> Result<Vec<Todo>, ApiError> {
    let wire: Vec<WireTodo> = serde_json::from_str(body).map_err(invalid)?;
    wire.into_iter()
        .map(WireTodo::validate)
        .collect::<Result<Vec<_>, _>>()
        .inspect_err(log_invalid)
}

fn invalid(err: serde_json::Error) -> ApiError {
    let err = ApiError::Validation(err.to_string());
    log_invalid(&err);
    err
}

fn log_invalid(err: &ApiError) {
    tracing::error!("data validation failed: {err}");
}

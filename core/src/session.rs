//! A `TodoClient`, a `Transport` and a `QueryCache` wired together.
//!
//! Reads are served from the cache when possible. Mutations go straight to
//! the server and, on success, invalidate every cached query; nothing is
//! updated optimistically and nothing is retried.

use crate::client::{todo_id, TodoClient};
use crate::error::{ApiError, Operation};
use crate::http::{HttpRequest, HttpResponse};
use crate::query::{QueryCache, QueryKey};
use crate::transport::Transport;
use crate::types::{Todo, TodoForm};

pub struct Session<T> {
    client: TodoClient,
    transport: T,
    cache: QueryCache,
}

impl<T: Transport> Session<T> {
    pub fn new(client: TodoClient, transport: T) -> Self {
        Self {
            client,
            transport,
            cache: QueryCache::new(),
        }
    }

    pub fn client(&self) -> &TodoClient {
        &self.client
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn todos(&mut self) -> Result<Vec<Todo>, ApiError> {
        if let Some(todos) = self.cache.list(&QueryKey::Todos) {
            return Ok(todos.to_vec());
        }
        let response = self.send(self.client.build_list_todos(), Operation::FetchTodos)?;
        let todos = self.client.parse_list_todos(response)?;
        self.cache.store_list(QueryKey::Todos, todos.clone());
        Ok(todos)
    }

    pub fn completed(&mut self) -> Result<Vec<Todo>, ApiError> {
        if let Some(todos) = self.cache.list(&QueryKey::Completed) {
            return Ok(todos.to_vec());
        }
        let response = self.send(self.client.build_list_completed(), Operation::FetchCompleted)?;
        let todos = self.client.parse_list_completed(response)?;
        self.cache.store_list(QueryKey::Completed, todos.clone());
        Ok(todos)
    }

    pub fn todo(&mut self, id: &str) -> Result<Todo, ApiError> {
        // Cached items are keyed by the server's form of the id.
        let key = todo_id(id).ok_or_else(|| ApiError::NotFound(id.to_string()))?;
        if let Some(todo) = self.cache.item(&key.to_string()) {
            return Ok(todo.clone());
        }
        let response = self.send(self.client.build_get_todo(id)?, Operation::FetchTodo)?;
        let todo = self.client.parse_get_todo(id, response)?;
        self.cache.store_item(todo.clone());
        Ok(todo)
    }

    pub fn create(&mut self, form: &TodoForm) -> Result<Todo, ApiError> {
        let response = self.send(self.client.build_create_todo(form)?, Operation::Create)?;
        let todo = self.client.parse_create_todo(response)?;
        self.invalidate();
        Ok(todo)
    }

    pub fn update(&mut self, id: &str, form: &TodoForm) -> Result<(), ApiError> {
        let response = self.send(self.client.build_update_todo(id, form)?, Operation::Update)?;
        self.client.parse_update_todo(response)?;
        self.invalidate();
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> Result<(), ApiError> {
        let response = self.send(self.client.build_remove_todo(id)?, Operation::Remove)?;
        self.client.parse_remove_todo(response)?;
        self.invalidate();
        Ok(())
    }

    fn send(&self, request: HttpRequest, operation: Operation) -> Result<HttpResponse, ApiError> {
        self.transport.execute(&request).map_err(|err| ApiError::Request {
            operation,
            status: None,
            message: err.to_string(),
        })
    }

    fn invalidate(&mut self) {
        let dropped = self.cache.invalidate_all();
        tracing::debug!(dropped, "invalidated cached queries");
    }
}

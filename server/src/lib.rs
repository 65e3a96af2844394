//! HTTP server owning the todo table.
//!
//! # Overview
//! Maps each route onto exactly one `TodoStore` operation:
//!
//! | Route | Store call | Success |
//! |---|---|---|
//! | `GET /todo` | `list` | 200 |
//! | `GET /todo/complete` | `list_completed` | 200 |
//! | `GET /todo/{id}` | `get` | 200 |
//! | `POST /todo` | `create` | 201 + `Location` |
//! | `PUT /todo/{id}` | `update` | 204 |
//! | `DELETE /todo/{id}` | `delete` | 204 |
//!
//! Misses on an id answer 404 with an empty body.
//!
//! # Design
//! The router is built from an explicit `TodoStore` and `Config`; there is no
//! process-wide registration. `PUT` replaces every writable field with what
//! the body carries, so clients are expected to send the whole object.

pub mod config;
pub mod error;
pub mod model;
pub mod store;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use config::Config;
pub use error::{AppError, StoreError};
pub use model::{Todo, TodoInput};
pub use store::TodoStore;

#[derive(Clone)]
struct AppState {
    store: TodoStore,
    strict_status: bool,
}

impl AppState {
    fn check_status(&self, input: &TodoInput) -> Result<(), AppError> {
        if self.strict_status && !model::is_known_status(&input.status) {
            return Err(AppError::UnknownStatus(input.status.clone()));
        }
        Ok(())
    }
}

pub fn app(store: TodoStore, config: &Config) -> Router {
    let state = AppState {
        store,
        strict_status: config.strict_status,
    };
    Router::new()
        .route("/", get(hello))
        .route("/todo", get(list_todos).post(create_todo))
        .route("/todo/complete", get(list_completed))
        .route("/todo/{id}", get(get_todo).put(update_todo).delete(delete_todo))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(listener: TcpListener, store: TodoStore, config: &Config) -> Result<(), std::io::Error> {
    axum::serve(listener, app(store, config)).await
}

async fn hello() -> &'static str {
    "Hello World!"
}

async fn list_todos(State(state): State<AppState>) -> Result<Json<Vec<Todo>>, AppError> {
    Ok(Json(state.store.list().await?))
}

async fn list_completed(State(state): State<AppState>) -> Result<Json<Vec<Todo>>, AppError> {
    Ok(Json(state.store.list_completed().await?))
}

async fn get_todo(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Todo>, AppError> {
    Ok(Json(state.store.get(id).await?))
}

async fn create_todo(
    State(state): State<AppState>,
    Json(input): Json<TodoInput>,
) -> Result<impl IntoResponse, AppError> {
    state.check_status(&input)?;
    let todo = state.store.create(input).await?;
    tracing::info!(id = todo.id, "created todo");
    let location = format!("/todo/{}", todo.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(todo)))
}

async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<TodoInput>,
) -> Result<StatusCode, AppError> {
    state.check_status(&input)?;
    state.store.update(id, input).await?;
    tracing::info!(id, "updated todo");
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_todo(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode, AppError> {
    state.store.delete(id).await?;
    tracing::info!(id, "deleted todo");
    Ok(StatusCode::NO_CONTENT)
}

//! SQLite-backed todo storage.
//!
//! # Design
//! One connection shared behind a `tokio::sync::Mutex`. Every operation takes
//! the lock, runs its statements synchronously and releases it, so each call
//! touches at most one row and concurrent writers simply serialize; the last
//! write wins. Nothing is validated here.

use std::{path::Path, sync::Arc};

use rusqlite::{params, Connection, OptionalExtension, Row};
use tokio::sync::Mutex;

use crate::error::StoreError;
use crate::model::{Todo, TodoInput, COMPLETE};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS Todos (
    Id INTEGER PRIMARY KEY AUTOINCREMENT,
    Title TEXT NOT NULL,
    Description TEXT,
    Status TEXT NOT NULL,
    ExpiredAt TEXT NOT NULL
);
"#;

const SELECT: &str = "SELECT Id, Title, Description, Status, ExpiredAt FROM Todos";

#[derive(Clone)]
pub struct TodoStore {
    conn: Arc<Mutex<Connection>>,
}

impl TodoStore {
    /// Open (or create) the database at `path`. `":memory:"` gives a private
    /// in-memory database.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        Self::with_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub async fn list(&self) -> Result<Vec<Todo>, StoreError> {
        let conn = self.conn.lock().await;
        query_all(&conn, &format!("{SELECT} ORDER BY Id"), params![])
    }

    /// Todos whose status is exactly `complete`.
    pub async fn list_completed(&self) -> Result<Vec<Todo>, StoreError> {
        let conn = self.conn.lock().await;
        query_all(&conn, &format!("{SELECT} WHERE Status = ?1 ORDER BY Id"), params![COMPLETE])
    }

    pub async fn get(&self, id: i64) -> Result<Todo, StoreError> {
        let conn = self.conn.lock().await;
        find(&conn, id)?.ok_or(StoreError::NotFound(id))
    }

    pub async fn create(&self, input: TodoInput) -> Result<Todo, StoreError> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO Todos (Title, Description, Status, ExpiredAt) VALUES (?1, ?2, ?3, ?4)",
            params![input.title, input.description, input.status, input.expired_at],
        )?;
        Ok(Todo::from_input(conn.last_insert_rowid(), input))
    }

    /// Replace every writable field of todo `id` with the values in `input`.
    pub async fn update(&self, id: i64, input: TodoInput) -> Result<Todo, StoreError> {
        let conn = self.conn.lock().await;
        let mut todo = find(&conn, id)?.ok_or(StoreError::NotFound(id))?;
        todo.replace_writable(input);
        conn.execute(
            "UPDATE Todos SET Title = ?1, Description = ?2, Status = ?3, ExpiredAt = ?4 WHERE Id = ?5",
            params![todo.title, todo.description, todo.status, todo.expired_at, todo.id],
        )?;
        Ok(todo)
    }

    pub async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        match conn.execute("DELETE FROM Todos WHERE Id = ?1", params![id])? {
            0 => Err(StoreError::NotFound(id)),
            _ => Ok(()),
        }
    }
}

fn find(conn: &Connection, id: i64) -> Result<Option<Todo>, StoreError> {
    let todo = conn
        .query_row(&format!("{SELECT} WHERE Id = ?1"), params![id], from_row)
        .optional()?;
    Ok(todo)
}

fn query_all(conn: &Connection, sql: &str, params: &[&dyn rusqlite::ToSql]) -> Result<Vec<Todo>, StoreError> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, from_row)?;
    let mut todos = Vec::new();
    for todo in rows {
        todos.push(todo?);
    }
    Ok(todos)
}

fn from_row(row: &Row<'_>) -> rusqlite::Result<Todo> {
    Ok(Todo {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        status: row.get(3)?,
        expired_at: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::timestamp;

    fn input(title: &str, status: &str) -> TodoInput {
        TodoInput {
            title: title.to_string(),
            description: None,
            status: status.to_string(),
            expired_at: timestamp::parse("2025-01-01").unwrap(),
        }
    }

    #[tokio::test]
    async fn create_then_get_returns_input_with_id() {
        let store = TodoStore::open_in_memory().unwrap();
        let mut new = input("Buy milk", "pending");
        new.description = Some("semi-skimmed".to_string());

        let created = store.create(new.clone()).await.unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created, Todo::from_input(created.id, new));
        assert_eq!(store.get(created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let store = TodoStore::open_in_memory().unwrap();
        let first = store.create(input("a", "pending")).await.unwrap();
        store.delete(first.id).await.unwrap();
        let second = store.create(input("b", "pending")).await.unwrap();
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let store = TodoStore::open_in_memory().unwrap();
        let todo = store.create(input("a", "pending")).await.unwrap();
        store.delete(todo.id).await.unwrap();
        assert!(matches!(store.get(todo.id).await, Err(StoreError::NotFound(id)) if id == todo.id));
    }

    #[tokio::test]
    async fn missing_ids_are_not_found_and_change_nothing() {
        let store = TodoStore::open_in_memory().unwrap();
        let todo = store.create(input("a", "pending")).await.unwrap();

        assert!(matches!(store.get(42).await, Err(StoreError::NotFound(42))));
        assert!(matches!(
            store.update(42, input("x", "complete")).await,
            Err(StoreError::NotFound(42))
        ));
        assert!(matches!(store.delete(42).await, Err(StoreError::NotFound(42))));

        assert_eq!(store.list().await.unwrap(), vec![todo]);
    }

    #[tokio::test]
    async fn update_overwrites_every_writable_field() {
        let store = TodoStore::open_in_memory().unwrap();
        let mut new = input("Buy milk", "pending");
        new.description = Some("semi-skimmed".to_string());
        let todo = store.create(new).await.unwrap();

        let replacement = TodoInput {
            title: "Buy oat milk".to_string(),
            description: None,
            status: "complete".to_string(),
            expired_at: timestamp::zero(),
        };
        let updated = store.update(todo.id, replacement).await.unwrap();
        assert_eq!(updated.id, todo.id);
        assert!(updated.description.is_none());
        assert_eq!(updated.expired_at, timestamp::zero());
        assert_eq!(store.get(todo.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn list_completed_is_exact_subset() {
        let store = TodoStore::open_in_memory().unwrap();
        for status in ["pending", "complete", "in-progress", "complete", "Complete"] {
            store.create(input(status, status)).await.unwrap();
        }

        let all = store.list().await.unwrap();
        let completed = store.list_completed().await.unwrap();
        assert_eq!(all.len(), 5);
        assert_eq!(completed.len(), 2);
        assert!(completed.iter().all(|t| t.status == "complete"));
        let expected: Vec<Todo> = all.into_iter().filter(|t| t.status == "complete").collect();
        assert_eq!(completed, expected);
    }

    #[tokio::test]
    async fn stores_unvalidated_values() {
        let store = TodoStore::open_in_memory().unwrap();
        let todo = store.create(input("", "done")).await.unwrap();
        let fetched = store.get(todo.id).await.unwrap();
        assert_eq!(fetched.title, "");
        assert_eq!(fetched.status, "done");
    }

    #[tokio::test]
    async fn file_database_survives_reopen() {
        let dir = std::env::temp_dir().join(format!("todo-store-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("todo.db");
        let _ = std::fs::remove_file(&path);

        let created = {
            let store = TodoStore::open(&path).unwrap();
            store.create(input("persisted", "pending")).await.unwrap()
        };
        let reopened = TodoStore::open(&path).unwrap();
        assert_eq!(reopened.get(created.id).await.unwrap(), created);

        drop(reopened);
        let _ = std::fs::remove_dir_all(&dir);
    }
}

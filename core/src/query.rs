//! Query keys and the client-side response cache.
//!
//! Reads are cached per key. Mutations never write into the cache; once one
//! succeeds the whole cache is dropped and the next read refetches.

use std::collections::HashMap;
use std::fmt;

use crate::types::Todo;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Todos,
    Completed,
    Todo(String),
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryKey::Todos => write!(f, r#"["todo"]"#),
            QueryKey::Completed => write!(f, r#"["todo","complete"]"#),
            QueryKey::Todo(id) => write!(f, r#"["todo",{{"id":"{id}"}}]"#),
        }
    }
}

#[derive(Debug, Clone)]
enum Entry {
    List(Vec<Todo>),
    Item(Todo),
}

#[derive(Debug, Default)]
pub struct QueryCache {
    entries: HashMap<QueryKey, Entry>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list(&self, key: &QueryKey) -> Option<&[Todo]> {
        match self.entries.get(key)? {
            Entry::List(todos) => Some(todos.as_slice()),
            Entry::Item(_) => None,
        }
    }

    pub fn item(&self, id: &str) -> Option<&Todo> {
        match self.entries.get(&QueryKey::Todo(id.to_string()))? {
            Entry::Item(todo) => Some(todo),
            Entry::List(_) => None,
        }
    }

    pub fn store_list(&mut self, key: QueryKey, todos: Vec<Todo>) {
        self.entries.insert(key, Entry::List(todos));
    }

    pub fn store_item(&mut self, todo: Todo) {
        self.entries.insert(QueryKey::Todo(todo.id.clone()), Entry::Item(todo));
    }

    pub fn invalidate(&mut self, key: &QueryKey) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Drop every cached query. Returns how many were dropped.
    pub fn invalidate_all(&mut self) -> usize {
        let dropped = self.entries.len();
        self.entries.clear();
        dropped
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

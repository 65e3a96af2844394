//! Domain types for the todo API, as the client sees them.
//!
//! # Design
//! The server sends ids as integers and `status` as free text. `Todo` is the
//! validated client view: the id is kept in string form, the status is a
//! `Status`, and `expiredAt` is a parsed date-time. `WireTodo` is the raw
//! shape and only exists on the way in. These types are defined independently
//! of the server crate; the integration tests catch schema drift.

use std::{fmt, str::FromStr};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, UnknownStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Pending,
    InProgress,
    Complete,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Pending, Status::InProgress, Status::Complete];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::InProgress => "in-progress",
            Status::Complete => "complete",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// A validated todo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: Status,
    #[serde(with = "timestamp")]
    pub expired_at: NaiveDateTime,
}

/// A todo exactly as the server serializes it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireTodo {
    id: i64,
    title: String,
    #[serde(default)]
    description: Option<String>,
    status: String,
    expired_at: String,
}

impl WireTodo {
    /// Check the raw todo and convert it into the client view.
    pub(crate) fn validate(self) -> Result<Todo, ApiError> {
        let id = self.id.to_string();
        if self.title.is_empty() {
            return Err(ApiError::Validation(format!("todo {id}: title must not be empty")));
        }
        let status = self
            .status
            .parse::<Status>()
            .map_err(|err| ApiError::Validation(format!("todo {id}: {err}")))?;
        let expired_at = timestamp::parse(&self.expired_at).map_err(|err| {
            ApiError::Validation(format!("todo {id}: expiredAt {:?} is not a date: {err}", self.expired_at))
        })?;
        Ok(Todo {
            id,
            title: self.title,
            description: self.description,
            status,
            expired_at,
        })
    }
}

/// Payload for creating or updating a todo.
///
/// The server overwrites every field on update, so an edit must start from
/// the full current todo (`TodoForm::from(&todo)`) rather than from scratch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoForm {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: Status,
    #[serde(with = "timestamp")]
    pub expired_at: NaiveDateTime,
}

impl TodoForm {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.title.is_empty() {
            return Err(ApiError::InvalidForm {
                field: "title",
                message: "title is required".to_string(),
            });
        }
        Ok(())
    }
}

impl From<&Todo> for TodoForm {
    fn from(todo: &Todo) -> Self {
        Self {
            title: todo.title.clone(),
            description: todo.description.clone(),
            status: todo.status,
            expired_at: todo.expired_at,
        }
    }
}

/// `expiredAt` parsing and formatting.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS[.fff]` and RFC 3339 with an
/// offset (converted to UTC).
pub mod timestamp {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

    pub fn parse(value: &str) -> Result<NaiveDateTime, chrono::ParseError> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
            return Ok(dt.naive_utc());
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, FORMAT) {
            return Ok(dt);
        }
        NaiveDate::parse_from_str(value, "%Y-%m-%d").map(|date| date.and_time(NaiveTime::MIN))
    }

    pub fn format(value: &NaiveDateTime) -> String {
        value.format(FORMAT).to_string()
    }

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }
}

//! Row and payload types for the `Todos` table.
//!
//! # Design
//! `Todo` is what the store persists and what every endpoint returns.
//! `TodoInput` is the body accepted by `POST /todo` and `PUT /todo/{id}`;
//! it carries every writable field and never the id. Status is free text
//! here: the enumeration is only enforced when the server runs with
//! `strict_status`.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Status values the client side of the API recognises.
pub const STATUSES: [&str; 3] = ["pending", "in-progress", "complete"];

/// Status matched by `GET /todo/complete`. Compared with exact equality.
pub const COMPLETE: &str = "complete";

/// Returns true if `status` is one of [`STATUSES`].
pub fn is_known_status(status: &str) -> bool {
    STATUSES.contains(&status)
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    #[serde(with = "timestamp")]
    pub expired_at: NaiveDateTime,
}

/// Body of create and update requests. `title` and `status` must be present;
/// a missing `description` is null and a missing `expiredAt` is
/// [`timestamp::zero`]. An `id` member, if sent, is ignored.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoInput {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: String,
    #[serde(default = "timestamp::zero", deserialize_with = "timestamp::deserialize")]
    pub expired_at: NaiveDateTime,
}

impl Todo {
    pub fn from_input(id: i64, input: TodoInput) -> Self {
        let TodoInput {
            title,
            description,
            status,
            expired_at,
        } = input;
        Self {
            id,
            title,
            description,
            status,
            expired_at,
        }
    }

    /// Overwrite every writable field with the value from `input`.
    ///
    /// Fields are copied unconditionally: a field the caller left out of the
    /// request body arrives here as its default and replaces the stored value.
    /// `id` is not writable.
    pub fn replace_writable(&mut self, input: TodoInput) {
        let TodoInput {
            title,
            description,
            status,
            expired_at,
        } = input;
        self.title = title;
        self.description = description;
        self.status = status;
        self.expired_at = expired_at;
    }
}

/// Wire format for `expiredAt`.
///
/// Accepts a bare date, a naive date-time, or an RFC 3339 timestamp with an
/// offset (normalised to UTC). Always writes `YYYY-MM-DDTHH:MM:SS`, with a
/// fractional part only when one is stored.
pub mod timestamp {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

    /// Value stored when a request omits `expiredAt`: `0001-01-01T00:00:00`.
    pub fn zero() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(1, 1, 1)
            .map(|date| date.and_time(NaiveTime::MIN))
            .unwrap_or_default()
    }

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

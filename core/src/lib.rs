//! Client core for the todo service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). Responses are validated on
//! the way in: ids become strings, statuses must be one of
//! pending / in-progress / complete, and `expiredAt` must be a date.
//!
//! # Design
//! - `TodoClient` is stateless; it holds only `base_url`.
//! - Each operation is split into `build_*` and `parse_*`, so the I/O
//!   boundary is explicit.
//! - `Session` adds a `Transport` and a `QueryCache` on top: cached reads,
//!   invalidate-everything after a successful mutation.
//! - DTOs are defined independently from the server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod error;
pub mod http;
pub mod query;
pub mod session;
pub mod transport;
pub mod types;

pub use client::TodoClient;
pub use error::{ApiError, Operation, TransportError, UnknownStatus};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use query::{QueryCache, QueryKey};
pub use session::Session;
pub use transport::Transport;
#[cfg(feature = "blocking")]
pub use transport::UreqTransport;
pub use types::{Status, Todo, TodoForm};

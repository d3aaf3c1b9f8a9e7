//! Blocking client for the Aivene search and query-generation service.
//!
//! # Overview
//! Three operations, `generate_queries`, `search` and `search_queries`,
//! each a single authenticated JSON POST. Successful responses are returned
//! as-is; failures are classified into "no response", "rejected with a
//! status >= 400" and "unexpected status".
//!
//! # Design
//! - `AiveneClient` builds `HttpRequest` values and classifies
//!   `HttpResponse` values without I/O (host-does-IO pattern).
//! - `Transport` executes the round trip; `UreqTransport` is the default.
//! - `Aivene` combines the two into one blocking call per operation.
//! - Unset optional parameters are `None` and never reach the wire.
//! - Diagnostics go through `tracing`; install a subscriber to see them.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod tool;
pub mod transport;
pub mod types;

pub use client::{Aivene, AiveneClient, Endpoint};
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{Error, Result, TransportError, GENERIC_ERROR_DETAIL};
pub use http::{HttpRequest, HttpResponse};
pub use tool::{FunctionCall, RunStatus, SearchTool, ToolCall, ToolOutput};
pub use transport::{Transport, UreqTransport};
pub use types::{GenerateQueries, Search, SearchOptions, SearchQueries};

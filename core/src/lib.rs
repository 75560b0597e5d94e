//! Typed endpoint-dispatch client for a search-engine REST API.
//!
//! # Overview
//! Every API operation is a request type built through a single-use builder,
//! a response type, and a static `SimpleEndpoint` descriptor that knows how
//! to turn the request into an `HttpRequest` and an `HttpResponse` back into
//! the response or a structured service error. The crate never opens a
//! socket: the host supplies a `Transport` (blocking) or `AsyncTransport`
//! and the invokers run one round-trip through it.
//!
//! # Design
//! - Descriptors are pure: the same request always yields the same method,
//!   path, query and body.
//! - Builders check required fields on `build()` and refuse to be built twice.
//! - `SearchClient` / `AsyncSearchClient` group operations by namespace
//!   (`snapshot`, `indices`, `ml`) over the same descriptors.
//! - Wire types are defined independently from the mock-server crate;
//!   integration tests catch schema drift.

pub mod builder;
pub mod client;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod indices;
pub mod ml;
pub mod query_dsl;
pub mod snapshot;
pub mod transport;
pub mod types;

pub use client::{AsyncSearchClient, SearchClient};
pub use endpoint::{ApiRequest, Endpoint, SimpleEndpoint};
pub use error::{ApiError, BuildError, ServiceError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{AsyncInvoker, AsyncTransport, Invoker, Transport, TransportOptions};
pub use types::{ErrorCause, ErrorResponse, ExpandWildcard, ShardStatistics, Time, WaitForActiveShards};

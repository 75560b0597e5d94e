//! Transport seam and the two invokers built on top of it.
//!
//! # Design
//! The library never performs I/O. A host implements `Transport` (blocking)
//! or `AsyncTransport` (future-returning) to execute one `HttpRequest`. The
//! `Invoker` and `AsyncInvoker` share all endpoint logic: encode with
//! `Endpoint::build_request`, call the transport once, decode with
//! `Endpoint::parse_response`. Neither retries; retry policy belongs to the
//! transport. Dropping the future returned by `AsyncInvoker::perform`
//! cancels the call.

use std::collections::BTreeMap;
use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::endpoint::{ApiRequest, Endpoint};
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};

/// Per-call options handed to the transport alongside every request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportOptions {
    /// Extra request headers.
    pub headers: Vec<(String, String)>,
    /// Extra query parameters; endpoint parameters take precedence.
    pub query_params: BTreeMap<String, String>,
    /// Upper bound for the whole call, enforced by the transport.
    #[serde(with = "millis", skip_serializing_if = "Option::is_none")]
    pub timeout: Option<Duration>,
    /// Pretty-print JSON request bodies.
    pub pretty: bool,
}

impl TransportOptions {
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_query_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.insert(name.into(), value.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

/// Timeouts travel as integer milliseconds.
mod millis {
    use std::time::Duration;

    use serde::ser::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(duration) => serializer.serialize_u64(u64::try_from(duration.as_millis()).map_err(S::Error::custom)?),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
    }
}

/// Blocking transport: executes one request and returns the raw response.
pub trait Transport {
    type Error: std::error::Error + Send + Sync + 'static;

    fn send(&self, request: HttpRequest, options: &TransportOptions) -> Result<HttpResponse, Self::Error>;
}

/// Non-blocking transport: the returned future completes exactly once.
pub trait AsyncTransport {
    type Error: std::error::Error + Send + Sync + 'static;

    fn send(
        &self,
        request: HttpRequest,
        options: &TransportOptions,
    ) -> impl Future<Output = Result<HttpResponse, Self::Error>> + Send;
}

/// Dispatches typed requests through a blocking `Transport`.
#[derive(Debug, Clone)]
pub struct Invoker<T> {
    transport: T,
    options: TransportOptions,
}

impl<T> Invoker<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            options: TransportOptions::default(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn options(&self) -> &TransportOptions {
        &self.options
    }

    /// Derive an invoker that shares the transport but uses other options.
    pub fn with_options(&self, options: TransportOptions) -> Self
    where
        T: Clone,
    {
        Self {
            transport: self.transport.clone(),
            options,
        }
    }
}

impl<T: Transport> Invoker<T> {
    /// Run `request` through `endpoint` and decode the outcome.
    pub fn perform<E>(&self, request: &E::Request, endpoint: &E) -> Result<E::Response, ApiError>
    where
        E: Endpoint + ?Sized,
    {
        let http = endpoint.build_request(request, &self.options)?;
        debug!(endpoint = endpoint.id(), method = %http.method, path = %http.path, "dispatching request");
        let response = self
            .transport
            .send(http, &self.options)
            .map_err(|e| ApiError::Transport(Box::new(e)))?;
        complete(endpoint, response)
    }

    /// Run `request` through the descriptor bound to its type.
    pub fn send<R: ApiRequest>(&self, request: &R) -> Result<R::Response, ApiError> {
        self.perform(request, R::endpoint())
    }
}

/// Dispatches typed requests through an `AsyncTransport`.
#[derive(Debug, Clone)]
pub struct AsyncInvoker<T> {
    transport: T,
    options: TransportOptions,
}

impl<T> AsyncInvoker<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            options: TransportOptions::default(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn options(&self) -> &TransportOptions {
        &self.options
    }

    pub fn with_options(&self, options: TransportOptions) -> Self
    where
        T: Clone,
    {
        Self {
            transport: self.transport.clone(),
            options,
        }
    }
}

impl<T: AsyncTransport> AsyncInvoker<T> {
    /// Run `request` through `endpoint`. Encoding failures are returned
    /// without calling the transport.
    pub async fn perform<E>(&self, request: &E::Request, endpoint: &E) -> Result<E::Response, ApiError>
    where
        E: Endpoint + ?Sized,
    {
        let http = endpoint.build_request(request, &self.options)?;
        debug!(endpoint = endpoint.id(), method = %http.method, path = %http.path, "dispatching request");
        let response = self
            .transport
            .send(http, &self.options)
            .await
            .map_err(|e| ApiError::Transport(Box::new(e)))?;
        complete(endpoint, response)
    }

    pub async fn send<R: ApiRequest>(&self, request: &R) -> Result<R::Response, ApiError> {
        self.perform(request, R::endpoint()).await
    }
}

fn complete<E>(endpoint: &E, response: HttpResponse) -> Result<E::Response, ApiError>
where
    E: Endpoint + ?Sized,
{
    let status = response.status;
    debug!(endpoint = endpoint.id(), status, "response received");
    let result = endpoint.parse_response(response);
    if let Err(ApiError::Service(err)) = &result {
        warn!(endpoint = endpoint.id(), status, kind = err.kind(), "service rejected request");
    }
    result
}

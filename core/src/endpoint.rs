//! Endpoint descriptors: the pure mapping between typed requests and HTTP.
//!
//! # Design
//! An `Endpoint` resolves a request value into its method, path, query
//! parameters and optional JSON body, and decodes a response payload into
//! either the typed success value or a `ServiceError`. All of these are pure
//! functions of their input, which is what lets the invokers in
//! `transport` stay generic over every operation.
//!
//! Operations declare their descriptor once as a `static SimpleEndpoint`,
//! built from plain function pointers. Descriptors hold no per-call state,
//! so a single instance is shared by every concurrent call.

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ApiError, ServiceError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::TransportOptions;
use crate::types::ErrorResponse;

/// Characters left verbatim inside a single path segment. Everything else,
/// including `/` and `,`, is percent-encoded.
const PATH_SEGMENT_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'*');

const CONTENT_TYPE: &str = "content-type";
const JSON_MEDIA_TYPE: &str = "application/json";

/// Append `segment` to `buf` as one percent-encoded path segment.
///
/// Each path parameter must be encoded on its own; a `/` inside a value is
/// data, never a separator.
pub fn path_encode(segment: &str, buf: &mut String) {
    buf.extend(utf8_percent_encode(segment, PATH_SEGMENT_SET));
}

/// Append a list path parameter (e.g. several index names) as one segment.
pub fn path_encode_list(values: &[String], buf: &mut String) {
    path_encode(&values.join(","), buf);
}

/// Body resolver for operations that never send a body.
pub fn no_body<R>(_request: &R) -> Result<Option<Value>, serde_json::Error> {
    Ok(None)
}

/// Query resolver for operations without query parameters.
pub fn no_params<R>(_request: &R) -> BTreeMap<String, String> {
    BTreeMap::new()
}

/// The contract between a typed operation and the wire.
pub trait Endpoint {
    type Request;
    type Response;

    /// Stable operation id, e.g. `snapshot.cleanup_repository`.
    fn id(&self) -> &'static str;

    fn method(&self, request: &Self::Request) -> HttpMethod;

    /// Relative, percent-encoded path.
    fn path(&self, request: &Self::Request) -> String;

    /// Query parameters for every optional field that was set.
    fn query_params(&self, request: &Self::Request) -> BTreeMap<String, String>;

    fn body(&self, request: &Self::Request) -> Result<Option<Value>, ApiError>;

    /// Any status outside 2xx is an error. Redirects are not followed by
    /// the core, so a 3xx that reaches it is reported, not decoded.
    fn is_error(&self, status: u16) -> bool {
        !(200..300).contains(&status)
    }

    fn decode_success(&self, body: &str) -> Result<Self::Response, ApiError>;

    fn decode_error(&self, status: u16, body: &str) -> Result<ServiceError, ApiError> {
        serde_json::from_str::<ErrorResponse>(body)
            .map(|error| ServiceError { status, error })
            .map_err(|e| ApiError::Decode(format!("error body for HTTP {status}: {e}")))
    }

    /// Encode `request` into plain HTTP data, applying per-call `options`.
    ///
    /// Option query parameters are overridden by endpoint parameters with the
    /// same name.
    fn build_request(
        &self,
        request: &Self::Request,
        options: &TransportOptions,
    ) -> Result<HttpRequest, ApiError> {
        let mut query = options.query_params.clone();
        query.extend(self.query_params(request));

        let mut headers = Vec::new();
        let body = match self.body(request)? {
            Some(value) => {
                let encoded = if options.pretty {
                    serde_json::to_string_pretty(&value)
                } else {
                    serde_json::to_string(&value)
                }
                .map_err(|e| ApiError::Serialization(e.to_string()))?;
                headers.push((CONTENT_TYPE.to_string(), JSON_MEDIA_TYPE.to_string()));
                Some(encoded)
            }
            None => None,
        };
        for (name, value) in &options.headers {
            if body.is_some() && name.eq_ignore_ascii_case(CONTENT_TYPE) {
                continue;
            }
            headers.push((name.clone(), value.clone()));
        }

        Ok(HttpRequest {
            method: self.method(request),
            path: self.path(request),
            query,
            headers,
            body,
        })
    }

    /// Decode a response into the success value or a `ServiceError`.
    fn parse_response(&self, response: HttpResponse) -> Result<Self::Response, ApiError> {
        if self.is_error(response.status) {
            let err = self.decode_error(response.status, &response.body)?;
            return Err(ApiError::Service(err));
        }
        self.decode_success(&response.body)
    }
}

/// Binds a request type to its response type and its descriptor.
pub trait ApiRequest: Sized + 'static {
    type Response: DeserializeOwned;

    fn endpoint() -> &'static SimpleEndpoint<Self, Self::Response>;
}

/// A descriptor assembled from plain functions, declared as a `static`.
pub struct SimpleEndpoint<Req, Resp> {
    id: &'static str,
    method: fn(&Req) -> HttpMethod,
    path: fn(&Req) -> String,
    query_params: fn(&Req) -> BTreeMap<String, String>,
    body: fn(&Req) -> Result<Option<Value>, serde_json::Error>,
    _response: PhantomData<fn() -> Resp>,
}

impl<Req, Resp> SimpleEndpoint<Req, Resp> {
    pub const fn new(
        id: &'static str,
        method: fn(&Req) -> HttpMethod,
        path: fn(&Req) -> String,
        query_params: fn(&Req) -> BTreeMap<String, String>,
        body: fn(&Req) -> Result<Option<Value>, serde_json::Error>,
    ) -> Self {
        Self {
            id,
            method,
            path,
            query_params,
            body,
            _response: PhantomData,
        }
    }
}

impl<Req, Resp> fmt::Debug for SimpleEndpoint<Req, Resp> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleEndpoint").field("id", &self.id).finish()
    }
}

impl<Req, Resp: DeserializeOwned> Endpoint for SimpleEndpoint<Req, Resp> {
    type Request = Req;
    type Response = Resp;

    fn id(&self) -> &'static str {
        self.id
    }

    fn method(&self, request: &Req) -> HttpMethod {
        (self.method)(request)
    }

    fn path(&self, request: &Req) -> String {
        (self.path)(request)
    }

    fn query_params(&self, request: &Req) -> BTreeMap<String, String> {
        (self.query_params)(request)
    }

    fn body(&self, request: &Req) -> Result<Option<Value>, ApiError> {
        (self.body)(request).map_err(|e| ApiError::Serialization(e.to_string()))
    }

    fn decode_success(&self, body: &str) -> Result<Resp, ApiError> {
        serde_json::from_str(body).map_err(|e| ApiError::Decode(format!("{}: {e}", self.id)))
    }
}

#[cfg(test)]
mod tests {
    use percent_encoding::percent_decode_str;
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    struct DocRequest {
        index: String,
        id: String,
        refresh: Option<bool>,
        payload: Option<Value>,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct DocResponse {
        result: String,
    }

    fn doc_method(request: &DocRequest) -> HttpMethod {
        if request.payload.is_some() {
            HttpMethod::Put
        } else {
            HttpMethod::Get
        }
    }

    fn doc_path(request: &DocRequest) -> String {
        let mut buf = String::from("/");
        path_encode(&request.index, &mut buf);
        buf.push_str("/_doc/");
        path_encode(&request.id, &mut buf);
        buf
    }

    fn doc_params(request: &DocRequest) -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();
        if let Some(refresh) = request.refresh {
            params.insert("refresh".to_string(), refresh.to_string());
        }
        params
    }

    fn doc_body(request: &DocRequest) -> Result<Option<Value>, serde_json::Error> {
        Ok(request.payload.clone())
    }

    static DOC_ENDPOINT: SimpleEndpoint<DocRequest, DocResponse> =
        SimpleEndpoint::new("test.doc", doc_method, doc_path, doc_params, doc_body);

    fn request(id: &str) -> DocRequest {
        DocRequest {
            index: "logs".to_string(),
            id: id.to_string(),
            refresh: None,
            payload: None,
        }
    }

    #[test]
    fn slash_in_path_value_is_encoded_and_round_trips() {
        let req = request("2024/01/a b");
        let path = DOC_ENDPOINT.path(&req);
        assert_eq!(path, "/logs/_doc/2024%2F01%2Fa%20b");

        let segment = path.rsplit('/').next().unwrap();
        let decoded = percent_decode_str(segment).decode_utf8().unwrap();
        assert_eq!(decoded, "2024/01/a b");
    }

    #[test]
    fn list_segments_encode_the_comma() {
        let mut buf = String::new();
        path_encode_list(&["a".to_string(), "logs-*".to_string()], &mut buf);
        assert_eq!(buf, "a%2Clogs-*");
    }

    #[test]
    fn unset_optional_fields_produce_no_query() {
        let req = request("1");
        assert!(DOC_ENDPOINT.query_params(&req).is_empty());

        let req = DocRequest {
            refresh: Some(true),
            ..request("1")
        };
        assert_eq!(DOC_ENDPOINT.query_params(&req)["refresh"], "true");
    }

    #[test]
    fn resolvers_are_deterministic() {
        let req = DocRequest {
            refresh: Some(false),
            payload: Some(json!({"a": 1})),
            ..request("x/y")
        };
        let first = DOC_ENDPOINT
            .build_request(&req, &TransportOptions::default())
            .unwrap();
        let second = DOC_ENDPOINT
            .build_request(&req, &TransportOptions::default())
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn build_request_without_body() {
        let req = request("1");
        let http = DOC_ENDPOINT
            .build_request(&req, &TransportOptions::default())
            .unwrap();
        assert_eq!(http.method, HttpMethod::Get);
        assert_eq!(http.path, "/logs/_doc/1");
        assert!(http.body.is_none());
        assert!(http.headers.is_empty());
    }

    #[test]
    fn build_request_with_body_sets_content_type() {
        let req = DocRequest {
            payload: Some(json!({"title": "hello"})),
            ..request("1")
        };
        let http = DOC_ENDPOINT
            .build_request(&req, &TransportOptions::default())
            .unwrap();
        assert_eq!(http.method, HttpMethod::Put);
        assert_eq!(
            http.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        assert_eq!(http.body.as_deref(), Some(r#"{"title":"hello"}"#));
    }

    #[test]
    fn options_are_merged_and_endpoint_params_win() {
        let req = DocRequest {
            refresh: Some(true),
            payload: Some(json!({"a": 1})),
            ..request("1")
        };
        let options = TransportOptions::default()
            .with_header("x-opaque-id", "trace-1")
            .with_header("Content-Type", "text/plain")
            .with_query_param("refresh", "false")
            .with_query_param("pretty", "true")
            .with_pretty(true);
        let http = DOC_ENDPOINT.build_request(&req, &options).unwrap();

        assert_eq!(http.query["refresh"], "true");
        assert_eq!(http.query["pretty"], "true");
        assert_eq!(
            http.headers,
            vec![
                ("content-type".to_string(), "application/json".to_string()),
                ("x-opaque-id".to_string(), "trace-1".to_string()),
            ]
        );
        assert_eq!(http.body.as_deref(), Some("{\n  \"a\": 1\n}"));
    }

    #[test]
    fn parse_success() {
        let response = HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: r#"{"result":"created"}"#.to_string(),
        };
        let parsed = DOC_ENDPOINT.parse_response(response).unwrap();
        assert_eq!(parsed.result, "created");
    }

    #[test]
    fn parse_service_error() {
        let response = HttpResponse {
            status: 404,
            headers: Vec::new(),
            body: r#"{"error":{"type":"index_not_found_exception","reason":"no such index [logs]"},"status":404}"#
                .to_string(),
        };
        let err = DOC_ENDPOINT.parse_response(response).unwrap_err();
        match err {
            ApiError::Service(service) => {
                assert_eq!(service.status, 404);
                assert_eq!(service.kind(), "index_not_found_exception");
            }
            other => panic!("expected service error, got {other:?}"),
        }
    }

    #[test]
    fn malformed_error_body_is_a_decode_error() {
        let response = HttpResponse {
            status: 500,
            headers: Vec::new(),
            body: "internal error".to_string(),
        };
        let err = DOC_ENDPOINT.parse_response(response).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn malformed_success_body_is_a_decode_error() {
        let response = HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: r#"{"unexpected":true}"#.to_string(),
        };
        let err = DOC_ENDPOINT.parse_response(response).unwrap_err();
        assert!(matches!(err, ApiError::Decode(msg) if msg.starts_with("test.doc")));
    }

    #[test]
    fn descriptor_debug_shows_id() {
        assert_eq!(format!("{DOC_ENDPOINT:?}"), r#"SimpleEndpoint { id: "test.doc" }"#);
    }

    #[test]
    fn non_2xx_statuses_are_never_decoded_as_success() {
        for status in [101, 204, 302, 304] {
            let response = HttpResponse {
                status,
                headers: vec![("location".to_string(), "/elsewhere".to_string())],
                body: r#"{"result":"created"}"#.to_string(),
            };
            let outcome = DOC_ENDPOINT.parse_response(response);
            if status == 204 {
                assert_eq!(outcome.unwrap().result, "created");
            } else {
                assert!(matches!(outcome, Err(ApiError::Decode(_))), "HTTP {status}");
            }
        }

        let redirect = HttpResponse {
            status: 307,
            headers: Vec::new(),
            body: r#"{"error":{"type":"redirect"},"status":307}"#.to_string(),
        };
        let err = DOC_ENDPOINT.parse_response(redirect).unwrap_err();
        assert_eq!(err.service().map(|e| e.status), Some(307));
    }
}

//! Error types for the search API client.
//!
//! # Design
//! Failures fall into three groups that callers branch on:
//! - the request could not be built (`BuildError`, raised before any I/O),
//! - the service rejected the request (`ApiError::Service`, a decoded error
//!   body with its HTTP status),
//! - the request never produced a usable response (`ApiError::Transport`
//!   passes the transport's own error through, `ApiError::Decode` reports a
//!   payload that does not match the declared schema).

use std::fmt;

use thiserror::Error;

use crate::types::ErrorResponse;

/// Errors raised when finalizing a builder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// A required field was never set.
    #[error("missing required field '{field}' on {type_name}")]
    MissingRequiredField {
        type_name: &'static str,
        field: &'static str,
    },

    /// `build()` was called on a builder that was already finalized.
    #[error("builder for {type_name} was already used")]
    BuilderReused { type_name: &'static str },
}

impl BuildError {
    /// Name of the missing field, if this is a `MissingRequiredField`.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            BuildError::MissingRequiredField { field, .. } => Some(field),
            BuildError::BuilderReused { .. } => None,
        }
    }
}

/// A structured failure reported by the service in a non-2xx response.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceError {
    pub status: u16,
    pub error: ErrorResponse,
}

impl ServiceError {
    /// The service's error type, e.g. `index_not_found_exception`.
    pub fn kind(&self) -> &str {
        &self.error.error.kind
    }

    pub fn reason(&self) -> Option<&str> {
        self.error.error.reason.as_deref()
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {} [{}]", self.status, self.kind())?;
        if let Some(reason) = self.reason() {
            write!(f, ": {reason}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ServiceError {}

/// Errors returned by endpoint dispatch.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request value could not be constructed.
    #[error(transparent)]
    Build(#[from] BuildError),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// A response or error payload did not match the declared schema.
    #[error("decode failed: {0}")]
    Decode(String),

    /// The service answered with a non-2xx status and a structured error.
    #[error("service error: {0}")]
    Service(ServiceError),

    /// The transport failed before a response was available.
    #[error("transport error: {0}")]
    Transport(Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
    /// Returns `true` when the service reported HTTP 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Service(err) if err.status == 404)
    }

    pub fn service(&self) -> Option<&ServiceError> {
        match self {
            ApiError::Service(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        ApiError::Service(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ErrorCause;

    fn service_error(status: u16, kind: &str, reason: Option<&str>) -> ServiceError {
        ServiceError {
            status,
            error: ErrorResponse {
                error: ErrorCause {
                    kind: kind.to_string(),
                    reason: reason.map(str::to_string),
                    ..ErrorCause::default()
                },
                status,
            },
        }
    }

    #[test]
    fn missing_field_message_names_type_and_field() {
        let err = BuildError::MissingRequiredField {
            type_name: "CleanupRepositoryRequest",
            field: "repository",
        };
        assert_eq!(
            err.to_string(),
            "missing required field 'repository' on CleanupRepositoryRequest"
        );
        assert_eq!(err.field(), Some("repository"));
    }

    #[test]
    fn build_error_converts_transparently() {
        let err: ApiError = BuildError::BuilderReused { type_name: "FlushRequest" }.into();
        assert_eq!(err.to_string(), "builder for FlushRequest was already used");
    }

    #[test]
    fn service_error_display() {
        let err = service_error(404, "index_not_found_exception", Some("no such index [logs]"));
        assert_eq!(
            err.to_string(),
            "HTTP 404 [index_not_found_exception]: no such index [logs]"
        );
        let api: ApiError = err.into();
        assert!(api.is_not_found());
        assert_eq!(api.service().map(ServiceError::kind), Some("index_not_found_exception"));
    }

    #[test]
    fn non_404_is_not_not_found() {
        let api = ApiError::Service(service_error(400, "illegal_argument_exception", None));
        assert!(!api.is_not_found());
        assert!(!ApiError::Decode("eof".to_string()).is_not_found());
    }
}

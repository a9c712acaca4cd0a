//! Engine types
//!
//! Observations fed into an inference session and the report it produces.

use crate::schema::{RequestBody, Response, Schema};
use crate::types::{JsonValue, Method, MultiMap};
use serde::Serialize;
use std::collections::BTreeMap;

/// Content type assumed when a body carries none
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// A decoded body and its content type
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub content_type: String,
    pub value: JsonValue,
}

impl Body {
    pub fn new(content_type: impl Into<String>, value: JsonValue) -> Self {
        Self {
            content_type: content_type.into(),
            value,
        }
    }

    /// A JSON body
    pub fn json(value: JsonValue) -> Self {
        Self::new(DEFAULT_CONTENT_TYPE, value)
    }
}

/// One observed request/response exchange, already decoded
///
/// `path` is the bucket key: templated (`/users/{id}`) when path pattern
/// detection ran, otherwise the concrete request path.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub path: String,
    pub method: Method,
    pub status: u16,
    pub request: Option<Body>,
    pub response: Option<Body>,
    /// Response headers worth documenting
    pub response_headers: MultiMap,
}

impl Observation {
    /// Create an observation without bodies
    pub fn new(method: Method, path: impl Into<String>, status: u16) -> Self {
        Self {
            path: path.into(),
            method,
            status,
            request: None,
            response: None,
            response_headers: MultiMap::new(),
        }
    }

    /// Set the request body
    #[must_use]
    pub fn with_request(mut self, body: Body) -> Self {
        self.request = Some(body);
        self
    }

    /// Set the response body
    #[must_use]
    pub fn with_response(mut self, body: Body) -> Self {
        self.response = Some(body);
        self
    }

    /// Add a response header value
    #[must_use]
    pub fn with_response_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.response_headers
            .entry(name.into())
            .or_default()
            .push(value.into());
        self
    }
}

/// Final schemas for one endpoint
#[derive(Debug, Clone, Serialize)]
pub struct EndpointReport {
    pub path: String,
    pub method: Method,

    /// Number of observations of this endpoint
    pub observations: usize,

    /// Merged request bodies, `None` when no request carried a body
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,

    /// Merged responses per status code
    pub responses: BTreeMap<u16, Response>,

    /// All request schemas of the endpoint folded together
    pub request_schema: Schema,

    /// All response schemas of the endpoint folded together, across statuses
    pub response_schema: Schema,
}

impl EndpointReport {
    /// Response for a status code
    pub fn response(&self, status: u16) -> Option<&Response> {
        self.responses.get(&status)
    }
}

/// Result of an inference session
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionReport {
    /// Total observations processed
    pub observations: usize,

    /// Endpoints sorted by path, then method
    pub endpoints: Vec<EndpointReport>,
}

impl SessionReport {
    /// Look up an endpoint
    pub fn endpoint(&self, path: &str, method: Method) -> Option<&EndpointReport> {
        self.endpoints
            .iter()
            .find(|e| e.path == path && e.method == method)
    }

    /// Whether no endpoint was observed
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}

/// Standard description of an HTTP status code
pub fn status_description(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        204 => "No Content",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Response",
    }
}

//! Stored transaction types
//!
//! The capture layer writes each exchange with PascalCase field names,
//! header and query maps of string lists, and bodies as base64 strings.

use crate::types::MultiMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// One captured request/response pair
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiTransaction {
    #[serde(default)]
    pub request: RequestData,
    #[serde(default)]
    pub response: ResponseData,
}

impl ApiTransaction {
    pub fn new(request: RequestData, response: ResponseData) -> Self {
        Self { request, response }
    }
}

/// Captured request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RequestData {
    #[serde(default)]
    pub method: String,

    #[serde(default)]
    pub path: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub query_params: MultiMap,

    #[serde(default, deserialize_with = "null_as_default")]
    pub headers: MultiMap,

    /// Base64 of the raw body bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl RequestData {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Default::default()
        }
    }

    /// Add a query parameter value
    #[must_use]
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params
            .entry(name.into())
            .or_default()
            .push(value.into());
        self
    }

    /// Add a header value
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.entry(name.into()).or_default().push(value.into());
        self
    }

    /// Set the already base64-encoded body
    #[must_use]
    pub fn with_body(mut self, encoded: impl Into<String>) -> Self {
        self.body = Some(encoded.into());
        self
    }
}

/// Captured response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResponseData {
    #[serde(default)]
    pub status_code: u16,

    #[serde(default, deserialize_with = "null_as_default")]
    pub headers: MultiMap,

    /// Base64 of the raw body bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl ResponseData {
    pub fn new(status_code: u16) -> Self {
        Self {
            status_code,
            ..Default::default()
        }
    }

    /// Add a header value
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.entry(name.into()).or_default().push(value.into());
        self
    }

    /// Set the already base64-encoded body
    #[must_use]
    pub fn with_body(mut self, encoded: impl Into<String>) -> Self {
        self.body = Some(encoded.into());
        self
    }
}

/// `null` decodes as the type's default
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

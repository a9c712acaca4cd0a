//! Body decoding
//!
//! Turns captured transactions into engine observations.

use super::types::ApiTransaction;
use crate::engine::{Body, Observation, DEFAULT_CONTENT_TYPE};
use crate::error::{Error, Result};
use crate::types::{JsonValue, Method, MultiMap};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use tracing::warn;

/// Headers every client or server sends; never documented
const COMMON_HEADERS: &[&str] = &[
    "Accept",
    "Accept-Charset",
    "Accept-Encoding",
    "Accept-Language",
    "Cache-Control",
    "Connection",
    "Content-Length",
    "Content-Type",
    "Cookie",
    "Date",
    "Host",
    "Origin",
    "Referer",
    "User-Agent",
    "X-Forwarded-For",
    "X-Forwarded-Proto",
];

/// Headers carrying credentials
const AUTH_HEADERS: &[&str] = &[
    "Authorization",
    "X-API-Key",
    "X-Auth-Token",
    "X-Auth",
    "Api-Key",
    "Token",
    "Bearer",
    "JWT",
];

/// Whether `name` is a common HTTP header (case-insensitive)
pub fn is_common_header(name: &str) -> bool {
    COMMON_HEADERS.iter().any(|h| h.eq_ignore_ascii_case(name))
}

/// Whether `name` is a credential-carrying header (case-insensitive)
pub fn is_auth_header(name: &str) -> bool {
    AUTH_HEADERS.iter().any(|h| h.eq_ignore_ascii_case(name))
}

/// Media type from a header map, without parameters
pub fn content_type(headers: &MultiMap) -> Option<String> {
    let value = headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("Content-Type"))
        .and_then(|(_, values)| values.first())?;

    let media_type = value.split(';').next().unwrap_or_default().trim();
    if media_type.is_empty() {
        None
    } else {
        Some(media_type.to_string())
    }
}

/// Decode a stored base64 body into JSON
///
/// Bodies captured twice over (base64 of base64 of JSON) are unwrapped.
/// Sanitisation placeholders are replaced with sample values afterwards.
pub fn decode_body(encoded: &str) -> Result<JsonValue> {
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| Error::decode(format!("Invalid base64 body: {e}")))?;

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(Error::decode("Empty body"));
    }

    let value = match serde_json::from_slice(&bytes) {
        Ok(value) => value,
        Err(e) => decode_nested(&bytes)
            .ok_or_else(|| Error::decode(format!("Failed to parse JSON body: {e}")))?,
    };

    Ok(restore_placeholders(value))
}

/// JSON behind a second base64 layer
fn decode_nested(bytes: &[u8]) -> Option<JsonValue> {
    let text = std::str::from_utf8(bytes).ok()?;
    let inner = STANDARD.decode(text.trim()).ok()?;
    serde_json::from_slice(&inner).ok()
}

/// Replace `"__string__"`-style placeholders left by body sanitisation
pub fn restore_placeholders(value: JsonValue) -> JsonValue {
    match value {
        JsonValue::Object(map) => JsonValue::Object(
            map.into_iter()
                .map(|(key, value)| (key, restore_placeholders(value)))
                .collect(),
        ),
        JsonValue::Array(items) => {
            JsonValue::Array(items.into_iter().map(restore_placeholders).collect())
        }
        JsonValue::String(s) => match s.as_str() {
            "__string__" => JsonValue::from("string"),
            "__integer__" => JsonValue::from(0),
            "__number__" => JsonValue::from(0.0),
            "__boolean__" => JsonValue::from(false),
            "__unknown__" => JsonValue::from("unknown"),
            "__redacted__" => JsonValue::from("redacted"),
            _ => JsonValue::String(s),
        },
        other => other,
    }
}

/// Decoded body with its content type
///
/// `None` when the body is absent or fails with a skippable error.
fn decode_part(encoded: Option<&str>, headers: &MultiMap, what: &str) -> Result<Option<Body>> {
    let Some(encoded) = encoded.filter(|body| !body.trim().is_empty()) else {
        return Ok(None);
    };

    match decode_body(encoded) {
        Ok(value) => {
            let content_type =
                content_type(headers).unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());
            Ok(Some(Body::new(content_type, value)))
        }
        Err(e) if e.is_skippable() => {
            warn!("Skipping {} body: {}", what, e);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

impl ApiTransaction {
    /// Parsed request method
    pub fn method(&self) -> Result<Method> {
        self.request.method.parse()
    }

    /// Decode into an observation bucketed under `path`
    ///
    /// Undecodable bodies are dropped; the exchange still counts for its
    /// status code. Fails on an unknown method or a non-skippable decode
    /// error.
    pub fn to_observation(&self, path: &str) -> Result<Observation> {
        let mut observation = Observation::new(self.method()?, path, self.response.status_code);

        observation.request = decode_part(
            self.request.body.as_deref(),
            &self.request.headers,
            "request",
        )?;
        observation.response = decode_part(
            self.response.body.as_deref(),
            &self.response.headers,
            "response",
        )?;
        observation.response_headers = self
            .response
            .headers
            .iter()
            .filter(|(name, values)| {
                !values.is_empty() && !is_common_header(name) && !is_auth_header(name)
            })
            .map(|(name, values)| (name.clone(), values.clone()))
            .collect();

        Ok(observation)
    }
}

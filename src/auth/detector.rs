//! Auth scheme detector

use super::types::{AuthScheme, Location};
use crate::traffic::{is_auth_header, is_common_header, ApiTransaction};
use crate::types::MultiMap;
use std::collections::BTreeMap;
use tracing::debug;

/// Key headers not already covered by the auth header list
const EXTRA_KEY_HEADERS: &[&str] = &["apikey", "App-Key", "AppKey"];

/// Query parameters that carry keys (case-sensitive)
const KEY_PARAMS: &[&str] = &[
    "api_key",
    "apikey",
    "api-key",
    "key",
    "token",
    "access_token",
    "auth_token",
];

/// Custom `X-` headers need a value longer than this to count as credentials
const MIN_CUSTOM_VALUE_LEN: usize = 10;

/// Collects the authentication schemes used across captured traffic
///
/// Looks at the `Authorization` header, API-key headers and query
/// parameters, long-valued custom `X-` headers, and `WWW-Authenticate` on
/// responses. The first detection of a scheme is kept; a later bearer token
/// that looks like a JWT only adds the `JWT` bearer format.
#[derive(Debug, Clone, Default)]
pub struct AuthDetector {
    schemes: BTreeMap<String, AuthScheme>,
}

impl AuthDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inspect one captured exchange
    pub fn analyze_transaction(&mut self, transaction: &ApiTransaction) {
        self.analyze_request_headers(&transaction.request.headers);
        self.analyze_query_params(&transaction.request.query_params);
        self.analyze_response_headers(&transaction.response.headers);
    }

    pub fn analyze_request_headers(&mut self, headers: &MultiMap) {
        for (name, value) in first_values(headers) {
            if name.eq_ignore_ascii_case("Authorization") {
                self.analyze_authorization(value);
            } else if is_key_header(name) {
                self.add(AuthScheme::api_key(
                    Location::Header,
                    name,
                    format!("API key authentication via {name} header"),
                ));
            } else if is_custom_credential(name, value) {
                self.add(AuthScheme::api_key(
                    Location::Header,
                    name,
                    format!("Custom authentication via {name} header"),
                ));
            }
        }
    }

    pub fn analyze_query_params(&mut self, params: &MultiMap) {
        for param in KEY_PARAMS {
            if params.get(*param).is_some_and(|values| !values.is_empty()) {
                self.add(AuthScheme::api_key(
                    Location::Query,
                    *param,
                    format!("API key authentication via {param} query parameter"),
                ));
            }
        }
    }

    /// Challenges in `WWW-Authenticate` name the expected scheme
    pub fn analyze_response_headers(&mut self, headers: &MultiMap) {
        let Some((_, challenge)) = first_values(headers)
            .find(|(name, _)| name.eq_ignore_ascii_case("WWW-Authenticate"))
        else {
            return;
        };

        let scheme = challenge
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        let description = match scheme.as_str() {
            "basic" => "Basic authentication",
            "bearer" => "Bearer token authentication",
            "digest" => "Digest authentication",
            _ => return,
        };
        self.add(AuthScheme::http(scheme, description));
    }

    fn analyze_authorization(&mut self, value: &str) {
        let Some((raw_scheme, credentials)) = value.trim().split_once(' ') else {
            return;
        };

        let scheme = raw_scheme.to_ascii_lowercase();
        let detected = match scheme.as_str() {
            "basic" => AuthScheme::http(
                scheme,
                "Basic authentication using base64 encoded credentials",
            ),
            "bearer" if is_jwt(credentials.trim()) => {
                AuthScheme::http(scheme, "Bearer token authentication using JWT")
                    .with_bearer_format("JWT")
            }
            "bearer" => AuthScheme::http(scheme, "Bearer token authentication"),
            "digest" => AuthScheme::http(scheme, "Digest access authentication"),
            _ => AuthScheme::http(
                scheme,
                format!("Custom authentication scheme: {raw_scheme}"),
            ),
        };
        self.add(detected);
    }

    fn add(&mut self, scheme: AuthScheme) {
        let key = scheme.key();
        match self.schemes.get_mut(&key) {
            Some(AuthScheme::Http {
                bearer_format: existing @ None,
                description,
                ..
            }) => {
                if let AuthScheme::Http {
                    bearer_format: Some(format),
                    description: better,
                    ..
                } = scheme
                {
                    *existing = Some(format);
                    *description = better;
                }
            }
            Some(_) => {}
            None => {
                debug!("Detected auth scheme {}", scheme.component_name());
                self.schemes.insert(key, scheme);
            }
        }
    }

    /// Detected schemes, in a stable order
    pub fn schemes(&self) -> impl Iterator<Item = &AuthScheme> {
        self.schemes.values()
    }

    pub fn len(&self) -> usize {
        self.schemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }
}

/// Name and first non-empty value of every header
fn first_values(headers: &MultiMap) -> impl Iterator<Item = (&str, &str)> {
    headers.iter().filter_map(|(name, values)| {
        values
            .first()
            .filter(|value| !value.is_empty())
            .map(|value| (name.as_str(), value.as_str()))
    })
}

fn is_key_header(name: &str) -> bool {
    is_auth_header(name) || EXTRA_KEY_HEADERS.iter().any(|h| h.eq_ignore_ascii_case(name))
}

fn is_custom_credential(name: &str, value: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.starts_with("x-")
        && !lower.contains("version")
        && !is_common_header(name)
        && value.len() > MIN_CUSTOM_VALUE_LEN
}

/// Three dot-separated segments
fn is_jwt(token: &str) -> bool {
    token.split('.').count() == 3
}

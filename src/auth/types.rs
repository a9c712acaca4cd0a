//! Auth scheme types
//!
//! Schemes as they are recognised in captured traffic, before they are laid
//! out as OpenAPI security schemes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where an API key is carried
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Header,
    Query,
}

impl Location {
    pub fn as_str(self) -> &'static str {
        match self {
            Location::Header => "header",
            Location::Query => "query",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An authentication scheme seen in traffic
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthScheme {
    /// `Authorization: <scheme> <credentials>` style authentication
    Http {
        /// Lower-case scheme name (`basic`, `bearer`, `digest`, ...)
        scheme: String,
        description: String,
        /// `JWT` when bearer tokens look like JSON Web Tokens
        bearer_format: Option<String>,
    },

    /// A key in a named header or query parameter
    ApiKey {
        location: Location,
        /// Header or parameter name as observed
        name: String,
        description: String,
    },
}

impl AuthScheme {
    /// HTTP scheme
    pub fn http(scheme: impl Into<String>, description: impl Into<String>) -> Self {
        AuthScheme::Http {
            scheme: scheme.into(),
            description: description.into(),
            bearer_format: None,
        }
    }

    /// API key scheme
    pub fn api_key(
        location: Location,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        AuthScheme::ApiKey {
            location,
            name: name.into(),
            description: description.into(),
        }
    }

    /// Set the bearer format (HTTP schemes only)
    #[must_use]
    pub fn with_bearer_format(mut self, format: impl Into<String>) -> Self {
        if let AuthScheme::Http { bearer_format, .. } = &mut self {
            *bearer_format = Some(format.into());
        }
        self
    }

    pub fn description(&self) -> &str {
        match self {
            AuthScheme::Http { description, .. } | AuthScheme::ApiKey { description, .. } => {
                description
            }
        }
    }

    /// Name under `components.securitySchemes`
    pub fn component_name(&self) -> String {
        match self {
            AuthScheme::Http { scheme, .. } => scheme.clone(),
            AuthScheme::ApiKey { name, .. } => format!("apiKey_{name}"),
        }
    }

    /// Identity used to deduplicate detections; names compare case-insensitively
    pub(crate) fn key(&self) -> String {
        match self {
            AuthScheme::Http { scheme, .. } => format!("http-{scheme}"),
            AuthScheme::ApiKey { location, name, .. } => {
                format!("apiKey-{location}-{}", name.to_ascii_lowercase())
            }
        }
    }
}

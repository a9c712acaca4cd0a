//! Authentication module
//!
//! Recognises the authentication schemes an API uses from the credentials
//! that show up in captured traffic: Basic, Bearer (JWT or opaque), Digest,
//! custom `Authorization` schemes, and API keys in headers or query
//! parameters.

mod detector;
mod types;

pub use detector::AuthDetector;
pub use types::{AuthScheme, Location};

#[cfg(test)]
mod tests;

// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]

//! # swagdoc
//!
//! Infers OpenAPI documentation from observed HTTP traffic, without any
//! annotation of the API being documented.
//!
//! ## Features
//!
//! - **Type Inference**: A schema tree from any JSON body
//! - **Refinement**: Formats, enums and integer ranges from repeated samples
//! - **Merging**: One coherent schema per endpoint out of many observations
//! - **Path Templating**: `/users/123` and `/users/456` become `/users/{id}`
//! - **Auth Detection**: Security schemes from observed credentials
//! - **OpenAPI Output**: 3.0.3 documents as JSON or YAML
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use swagdoc::{InferenceConfig, OpenApiGenerator, TransactionStore};
//!
//! fn main() -> swagdoc::Result<()> {
//!     let transactions = TransactionStore::new("./swagdoc-data").load_all()?;
//!     let document = OpenApiGenerator::new(InferenceConfig::default()).generate(&transactions);
//!     println!("{}", document.to_json_pretty()?);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌─────────────────────────────┐   ┌──────────┐
//! │   traffic    │──▶│    paths     │──▶│           engine            │──▶│ openapi  │
//! │ store/decode │   │  templating  │   │ infer → merge → refine      │   │ document │
//! └──────────────┘   └──────────────┘   └─────────────────────────────┘   └──────────┘
//!                                                      │
//!                                               ┌──────┴──────┐
//!                                               │   schema    │
//!                                               └─────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Inference and document configuration
pub mod config;

/// Schema inference, refinement and merging
pub mod schema;

/// Captured transactions and body decoding
pub mod traffic;

/// Path pattern detection
pub mod paths;

/// Auth scheme detection
pub mod auth;

/// Inference sessions over observed traffic
pub mod engine;

/// OpenAPI document model and generator
pub mod openapi;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use auth::{AuthDetector, AuthScheme};
pub use config::{DocumentConfig, InferenceConfig, ServerConfig};
pub use engine::{Body, InferenceSession, Observation, SessionReport};
pub use openapi::{Document, DocumentFormat, OpenApiGenerator};
pub use schema::{infer_schema, merge_schema, Schema, SchemaMerger, SchemaRefiner, SchemaType};
pub use traffic::{ApiTransaction, TransactionStore};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

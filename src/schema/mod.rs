//! Schema inference and merging
//!
//! Turns observed JSON bodies into schema trees and reconciles the schemas
//! of many observations of the same endpoint.
//!
//! # Features
//!
//! - **Type Inference**: Infers a schema from a single JSON value
//! - **Format Detection**: uuid, email, uri, dates, times, IP addresses
//! - **Sample Refinement**: Enums, integer ranges and nullability from many samples
//! - **Schema Merging**: Folds per-transaction schemas into one per endpoint

mod format;
mod infer;
mod merge;
mod refine;
mod samples;
mod types;

pub use format::{detect_date_structure, FormatDetector};
pub use infer::{infer_schema, EmptyArrayItems, FormatDetection, ValueInferrer};
pub use merge::{
    merge_request_bodies, merge_responses, merge_schema, merge_schema_with, schemas_equal,
    RequiredPolicy, SchemaMerger,
};
pub use refine::{apply_type_inference, merge_with_improvement, SchemaRefiner};
pub use samples::{effective_max_samples, SampleCollector, DEFAULT_MAX_SAMPLES};
pub use types::{Format, Header, MediaType, RequestBody, Response, Schema, SchemaType};

#[cfg(test)]
mod tests;

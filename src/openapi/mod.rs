//! OpenAPI document generation
//!
//! # Overview
//!
//! The openapi module provides:
//! - `OpenApiGenerator` - Captured traffic in, OpenAPI 3.0.3 document out
//! - `Document` and friends - The subset of the OpenAPI model that gets written
//! - `SchemaObject` - Inferred schemas transcribed into document form
//! - `SecuritySchemeObject` - Detected auth schemes under `components`

mod generator;
mod types;

pub use generator::{operation_id, operation_tag, path_parameter_schema, OpenApiGenerator};
pub use types::{
    Components, Document, DocumentFormat, HeaderObject, Info, MediaTypeObject, Operation,
    Parameter, ParameterLocation, RequestBodyObject, ResponseObject, SchemaObject,
    SecuritySchemeObject, SecuritySchemeType, Server, OPENAPI_VERSION,
};

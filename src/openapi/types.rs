//! OpenAPI 3.0 document model
//!
//! Only the parts of the document the generator fills in.

use crate::auth::{AuthScheme, Location};
use crate::config::DocumentConfig;
use crate::error::{Error, Result};
use crate::schema::{Format, Header, MediaType, RequestBody, Response, Schema, SchemaType};
use crate::types::OptionStringExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// OpenAPI version written to every document
pub const OPENAPI_VERSION: &str = "3.0.3";

// ============================================================================
// Document
// ============================================================================

/// Serialization format of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    #[default]
    Json,
    Yaml,
}

/// A generated OpenAPI document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub openapi: String,

    pub info: Info,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<Server>,

    /// Path template -> lower-case method -> operation
    pub paths: BTreeMap<String, BTreeMap<String, Operation>>,

    #[serde(skip_serializing_if = "Components::is_empty")]
    pub components: Components,
}

impl Document {
    /// Empty document with `info` and `servers` from configuration
    pub fn new(config: &DocumentConfig) -> Self {
        Self {
            openapi: OPENAPI_VERSION.to_string(),
            info: Info {
                title: config.title.clone(),
                description: config.description.clone(),
                version: config.version.clone(),
            },
            servers: config
                .servers
                .iter()
                .map(|server| Server {
                    url: server.url.clone(),
                    description: server.description.clone().none_if_empty(),
                })
                .collect(),
            paths: BTreeMap::new(),
            components: Components::default(),
        }
    }

    /// Operation by path template and method
    pub fn operation(&self, path: &str, method: &str) -> Option<&Operation> {
        self.paths
            .get(path)
            .and_then(|item| item.get(&method.to_ascii_lowercase()))
    }

    /// Number of operations across all paths
    pub fn operation_count(&self) -> usize {
        self.paths.values().map(BTreeMap::len).sum()
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::output(format!("Failed to serialize document as JSON: {e}")))
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| Error::output(format!("Failed to serialize document as YAML: {e}")))
    }

    /// Serialize in the given format
    pub fn render(&self, format: DocumentFormat) -> Result<String> {
        match format {
            DocumentFormat::Json => self.to_json_pretty(),
            DocumentFormat::Yaml => self.to_yaml(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Info {
    pub title: String,
    pub description: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Server {
    pub url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// ============================================================================
// Components
// ============================================================================

/// Reusable document objects; only security schemes are generated
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Components {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub security_schemes: BTreeMap<String, SecuritySchemeObject>,
}

impl Components {
    pub fn is_empty(&self) -> bool {
        self.security_schemes.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SecuritySchemeType {
    #[serde(rename = "http")]
    Http,
    #[serde(rename = "apiKey")]
    ApiKey,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecuritySchemeObject {
    #[serde(rename = "type")]
    pub scheme_type: SecuritySchemeType,

    pub description: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bearer_format: Option<String>,

    #[serde(rename = "in", skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl From<&AuthScheme> for SecuritySchemeObject {
    fn from(scheme: &AuthScheme) -> Self {
        match scheme {
            AuthScheme::Http {
                scheme,
                description,
                bearer_format,
            } => Self {
                scheme_type: SecuritySchemeType::Http,
                description: description.clone(),
                scheme: Some(scheme.clone()),
                bearer_format: bearer_format.clone(),
                location: None,
                name: None,
            },
            AuthScheme::ApiKey {
                location,
                name,
                description,
            } => Self {
                scheme_type: SecuritySchemeType::ApiKey,
                description: description.clone(),
                scheme: None,
                bearer_format: None,
                location: Some(*location),
                name: Some(name.clone()),
            },
        }
    }
}

// ============================================================================
// Operations
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub operation_id: String,

    pub summary: String,

    pub tags: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBodyObject>,

    /// Status code -> response
    pub responses: BTreeMap<String, ResponseObject>,
}

impl Operation {
    /// Parameter by location and name
    pub fn parameter(&self, location: ParameterLocation, name: &str) -> Option<&Parameter> {
        self.parameters
            .iter()
            .find(|p| p.location == location && p.name == name)
    }

    /// Schema of a JSON response body
    pub fn response_schema(&self, status: u16) -> Option<&SchemaObject> {
        self.responses
            .get(&status.to_string())
            .and_then(|response| response.content.get("application/json"))
            .map(|media| &media.schema)
    }
}

/// Where a parameter is carried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub name: String,

    #[serde(rename = "in")]
    pub location: ParameterLocation,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub required: bool,

    pub schema: SchemaObject,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
}

impl Parameter {
    /// Required path parameter
    pub fn path(name: impl Into<String>, schema: SchemaObject) -> Self {
        let name = name.into();
        Self {
            description: Some(format!("Path parameter: {name}")),
            name,
            location: ParameterLocation::Path,
            required: true,
            schema,
            example: None,
        }
    }

    /// Optional string parameter with an observed example
    pub fn observed(
        location: ParameterLocation,
        name: impl Into<String>,
        example: Option<&String>,
    ) -> Self {
        Self {
            name: name.into(),
            location,
            description: None,
            required: false,
            schema: SchemaObject::typed(SchemaType::String),
            example: example.map(|value| Value::String(value.clone())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestBodyObject {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub content: BTreeMap<String, MediaTypeObject>,

    pub required: bool,
}

impl From<&RequestBody> for RequestBodyObject {
    fn from(body: &RequestBody) -> Self {
        Self {
            description: body.description.clone(),
            content: content_objects(&body.content),
            required: body.required,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseObject {
    pub description: String,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, HeaderObject>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub content: BTreeMap<String, MediaTypeObject>,
}

impl From<&Response> for ResponseObject {
    fn from(response: &Response) -> Self {
        Self {
            description: response.description.clone(),
            headers: response
                .headers
                .iter()
                .map(|(name, header)| (name.clone(), HeaderObject::from(header)))
                .collect(),
            content: content_objects(&response.content),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaTypeObject {
    pub schema: SchemaObject,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
}

impl From<&MediaType> for MediaTypeObject {
    fn from(media: &MediaType) -> Self {
        Self {
            schema: SchemaObject::from(&media.schema),
            example: media.example.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderObject {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub schema: SchemaObject,
}

impl From<&Header> for HeaderObject {
    fn from(header: &Header) -> Self {
        Self {
            description: header.description.clone(),
            schema: SchemaObject::from(&header.schema),
        }
    }
}

fn content_objects(content: &BTreeMap<String, MediaType>) -> BTreeMap<String, MediaTypeObject> {
    content
        .iter()
        .map(|(content_type, media)| (content_type.clone(), MediaTypeObject::from(media)))
        .collect()
}

// ============================================================================
// Schema Object
// ============================================================================

/// Schema as written into the document
///
/// Integers always carry `int32` or `int64`, numbers `double`. Objects
/// always carry `properties`; arrays always carry `items` (`{}` when no
/// element was observed).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SchemaObject {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<Format>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, SchemaObject>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaObject>>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub nullable: bool,
}

impl SchemaObject {
    pub fn typed(schema_type: SchemaType) -> Self {
        Self {
            schema_type: Some(schema_type),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    /// Property by name
    pub fn property(&self, name: &str) -> Option<&SchemaObject> {
        self.properties.as_ref().and_then(|props| props.get(name))
    }
}

impl From<&Schema> for SchemaObject {
    fn from(schema: &Schema) -> Self {
        let mut object = SchemaObject {
            schema_type: schema.schema_type,
            enum_values: schema.enum_values.clone(),
            example: schema.example.clone(),
            nullable: schema.nullable,
            ..SchemaObject::default()
        };

        match schema.schema_type {
            Some(SchemaType::String) => object.format = schema.format,
            Some(SchemaType::Integer) => {
                object.format = Some(if schema.format == Some(Format::Int64) {
                    Format::Int64
                } else {
                    Format::Int32
                });
            }
            Some(SchemaType::Number) => object.format = Some(Format::Double),
            Some(SchemaType::Boolean) => {}
            Some(SchemaType::Array) => {
                let items = schema
                    .items
                    .as_deref()
                    .map(SchemaObject::from)
                    .unwrap_or_default();
                object.items = Some(Box::new(items));
            }
            Some(SchemaType::Object) => {
                object.properties = Some(
                    schema
                        .properties
                        .iter()
                        .flatten()
                        .map(|(name, prop)| (name.clone(), SchemaObject::from(prop)))
                        .collect(),
                );
                object.required = schema.required.iter().cloned().collect();
            }
            Some(SchemaType::Null) => {
                object.schema_type = None;
                object.nullable = true;
            }
            None => {}
        }

        object
    }
}

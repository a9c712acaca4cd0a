//! Schema types

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Observed JSON type of a schema node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    Null,
    Boolean,
    Integer,
    Number,
    String,
    Object,
    Array,
}

impl SchemaType {
    /// Name as it appears in OpenAPI documents
    pub fn as_str(self) -> &'static str {
        match self {
            SchemaType::Null => "null",
            SchemaType::Boolean => "boolean",
            SchemaType::Integer => "integer",
            SchemaType::Number => "number",
            SchemaType::String => "string",
            SchemaType::Object => "object",
            SchemaType::Array => "array",
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Semantic refinement of a `string`, `integer` or `number` schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Format {
    #[serde(rename = "uuid")]
    Uuid,
    #[serde(rename = "email")]
    Email,
    #[serde(rename = "uri")]
    Uri,
    #[serde(rename = "date")]
    Date,
    #[serde(rename = "time")]
    Time,
    #[serde(rename = "date-time")]
    DateTime,
    #[serde(rename = "ipv4")]
    Ipv4,
    #[serde(rename = "ipv6")]
    Ipv6,
    #[serde(rename = "numeric")]
    Numeric,
    /// Opaque value: the observed samples could not be reconciled to one type
    #[serde(rename = "any")]
    Any,
    #[serde(rename = "int32")]
    Int32,
    #[serde(rename = "int64")]
    Int64,
    #[serde(rename = "double")]
    Double,
}

impl Format {
    pub fn as_str(self) -> &'static str {
        match self {
            Format::Uuid => "uuid",
            Format::Email => "email",
            Format::Uri => "uri",
            Format::Date => "date",
            Format::Time => "time",
            Format::DateTime => "date-time",
            Format::Ipv4 => "ipv4",
            Format::Ipv6 => "ipv6",
            Format::Numeric => "numeric",
            Format::Any => "any",
            Format::Int32 => "int32",
            Format::Int64 => "int64",
            Format::Double => "double",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inferred schema node
///
/// A node with no `schema_type` is a placeholder: no evidence has been
/// observed for it yet. Object nodes always carry `properties`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<Format>,

    /// Object properties (only for `object`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, Schema>>,

    /// Array element schema (only for `array`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,

    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub required: BTreeSet<String>,

    /// Distinct literal values, in first-observed order
    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub nullable: bool,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(value: &bool) -> bool {
    !*value
}

impl Schema {
    /// Create a schema of the given type
    pub fn new(schema_type: SchemaType) -> Self {
        Self {
            schema_type: Some(schema_type),
            ..Self::default()
        }
    }

    /// Create an empty placeholder ("no evidence")
    pub fn placeholder() -> Self {
        Self::default()
    }

    /// Create a `null` schema marked nullable
    pub fn null() -> Self {
        Self {
            schema_type: Some(SchemaType::Null),
            nullable: true,
            ..Self::default()
        }
    }

    /// Create an object schema with the given properties
    pub fn object(properties: BTreeMap<String, Schema>) -> Self {
        Self {
            schema_type: Some(SchemaType::Object),
            properties: Some(properties),
            ..Self::default()
        }
    }

    /// Create an array schema; `None` items means no element was observed
    pub fn array(items: Option<Schema>) -> Self {
        Self {
            schema_type: Some(SchemaType::Array),
            items: items.map(Box::new),
            ..Self::default()
        }
    }

    /// The opaque `{type: string, format: any}` schema used when samples disagree
    pub fn opaque() -> Self {
        Self::new(SchemaType::String).with_format(Format::Any)
    }

    /// Set format
    #[must_use]
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    /// Set example value
    #[must_use]
    pub fn with_example(mut self, example: Value) -> Self {
        self.example = Some(example);
        self
    }

    /// Mark as nullable
    #[must_use]
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Whether this node carries no evidence yet
    pub fn is_placeholder(&self) -> bool {
        self.schema_type.is_none()
    }

    /// Whether this node has the given type
    pub fn is(&self, schema_type: SchemaType) -> bool {
        self.schema_type == Some(schema_type)
    }

    /// Get a property (objects only)
    pub fn property(&self, name: &str) -> Option<&Schema> {
        self.properties.as_ref().and_then(|props| props.get(name))
    }

    /// Check if a property is required
    pub fn is_required(&self, name: &str) -> bool {
        self.required.contains(name)
    }

    /// Convert to pretty JSON string
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

// ============================================================================
// Request / Response Envelopes
// ============================================================================

/// Schema of one body media type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaType {
    pub schema: Schema,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
}

impl MediaType {
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            example: None,
        }
    }
}

/// Response header description
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Header {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub schema: Schema,
}

/// Request body observed for one endpoint, keyed by content type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub content: BTreeMap<String, MediaType>,

    #[serde(default)]
    pub required: bool,
}

impl RequestBody {
    /// A required body with a single content type
    pub fn single(content_type: impl Into<String>, schema: Schema) -> Self {
        let mut content = BTreeMap::new();
        content.insert(content_type.into(), MediaType::new(schema));
        Self {
            description: None,
            content,
            required: true,
        }
    }
}

/// Response observed for one status code
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub description: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub content: BTreeMap<String, MediaType>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, Header>,
}

impl Response {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    /// Add a body schema for a content type
    #[must_use]
    pub fn with_content(mut self, content_type: impl Into<String>, schema: Schema) -> Self {
        self.content
            .insert(content_type.into(), MediaType::new(schema));
        self
    }

    /// Add a header schema
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, schema: Schema) -> Self {
        self.headers.insert(
            name.into(),
            Header {
                description: None,
                schema,
            },
        );
        self
    }
}

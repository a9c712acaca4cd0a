//! Schema merging across observations

use super::types::{Header, MediaType, RequestBody, Response, Schema, SchemaType};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// How `required` sets combine when two object schemas merge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequiredPolicy {
    /// A property required by either side stays required
    #[default]
    Union,
    /// Only properties required by both sides stay required
    Intersection,
}

/// Collects per-transaction schemas per endpoint and folds them together
///
/// Buckets are keyed by `path` and method; response schemas live in a
/// parallel bucket under `path + ":response"`.
#[derive(Debug, Clone, Default)]
pub struct SchemaMerger {
    schemas: HashMap<String, Vec<Schema>>,
    required_policy: RequiredPolicy,
}

impl SchemaMerger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the `required` merge policy
    #[must_use]
    pub fn with_required_policy(mut self, policy: RequiredPolicy) -> Self {
        self.required_policy = policy;
        self
    }

    /// The `required` merge policy in use
    pub fn required_policy(&self) -> RequiredPolicy {
        self.required_policy
    }

    /// Append a request schema for an endpoint
    pub fn add_schema(&mut self, path: &str, method: &str, schema: Schema) {
        self.schemas
            .entry(bucket_key(path, method))
            .or_default()
            .push(schema);
    }

    /// Append a response schema for an endpoint
    pub fn add_response_schema(&mut self, path: &str, method: &str, schema: Schema) {
        self.add_schema(&response_path(path), method, schema);
    }

    /// Number of schemas collected for an endpoint
    pub fn schema_count(&self, path: &str, method: &str) -> usize {
        self.schemas
            .get(&bucket_key(path, method))
            .map_or(0, Vec::len)
    }

    /// Fold the request schemas of an endpoint, left to right
    ///
    /// Zero schemas give a placeholder; a single schema is returned as-is.
    pub fn merge_schemas(&self, path: &str, method: &str) -> Schema {
        let Some(schemas) = self.schemas.get(&bucket_key(path, method)) else {
            return Schema::placeholder();
        };

        let mut iter = schemas.iter();
        let Some(first) = iter.next() else {
            return Schema::placeholder();
        };

        iter.fold(first.clone(), |acc, next| {
            merge_schema_with(&acc, next, self.required_policy)
        })
    }

    /// Fold the response schemas of an endpoint
    pub fn merge_response_schemas(&self, path: &str, method: &str) -> Schema {
        self.merge_schemas(&response_path(path), method)
    }
}

fn bucket_key(path: &str, method: &str) -> String {
    format!("{path}:{method}")
}

fn response_path(path: &str) -> String {
    format!("{path}:response")
}

/// Merge two schemas with the union `required` policy
pub fn merge_schema(a: &Schema, b: &Schema) -> Schema {
    merge_schema_with(a, b, RequiredPolicy::Union)
}

/// Merge two schemas
///
/// Conflicting concrete types escalate to `object`, which drops the
/// `format` and `items` of either side. Otherwise examples and formats are
/// first-wins. Enums are unioned in first-seen order and nullability is
/// OR-ed.
pub fn merge_schema_with(a: &Schema, b: &Schema, policy: RequiredPolicy) -> Schema {
    let mut result = a.clone();
    let mut escalated = false;

    match (a.schema_type, b.schema_type) {
        (None, Some(t)) => result.schema_type = Some(t),
        (Some(x), Some(y)) if x != y => {
            result.schema_type = Some(SchemaType::Object);
            result.format = None;
            result.items = None;
            escalated = true;
        }
        _ => {}
    }

    match result.schema_type {
        Some(SchemaType::Object) => {
            result.properties = Some(merge_properties(
                a.properties.as_ref(),
                b.properties.as_ref(),
                policy,
            ));
            result.required = merge_required(a, b, policy);
        }
        Some(SchemaType::Array) => {
            result.items = match (&a.items, &b.items) {
                (Some(x), Some(y)) => Some(Box::new(merge_schema_with(x, y, policy))),
                (None, Some(y)) => Some(y.clone()),
                (x, None) => x.clone(),
            };
        }
        _ => {}
    }

    if result.example.is_none() {
        result.example.clone_from(&b.example);
    }
    if result.format.is_none() && !escalated {
        result.format = b.format;
    }

    for value in &b.enum_values {
        if !result.enum_values.contains(value) {
            result.enum_values.push(value.clone());
        }
    }

    result.nullable = a.nullable || b.nullable;
    result
}

fn merge_properties(
    a: Option<&BTreeMap<String, Schema>>,
    b: Option<&BTreeMap<String, Schema>>,
    policy: RequiredPolicy,
) -> BTreeMap<String, Schema> {
    let mut merged = a.cloned().unwrap_or_default();

    for (name, schema) in b.into_iter().flatten() {
        let combined = match merged.get(name) {
            Some(existing) => merge_schema_with(existing, schema, policy),
            None => schema.clone(),
        };
        merged.insert(name.clone(), combined);
    }

    merged
}

fn merge_required(a: &Schema, b: &Schema, policy: RequiredPolicy) -> BTreeSet<String> {
    match policy {
        RequiredPolicy::Union => a.required.union(&b.required).cloned().collect(),
        // A side without evidence does not veto the other
        RequiredPolicy::Intersection if a.is_placeholder() => b.required.clone(),
        RequiredPolicy::Intersection if b.is_placeholder() => a.required.clone(),
        RequiredPolicy::Intersection => a.required.intersection(&b.required).cloned().collect(),
    }
}

/// Structural equality over type, format, nullability, properties, items
/// and enum (order-sensitive). Examples and `required` are ignored.
pub fn schemas_equal(a: &Schema, b: &Schema) -> bool {
    if a.schema_type != b.schema_type || a.format != b.format || a.nullable != b.nullable {
        return false;
    }

    if a.is(SchemaType::Object) {
        let empty = BTreeMap::new();
        let props_a = a.properties.as_ref().unwrap_or(&empty);
        let props_b = b.properties.as_ref().unwrap_or(&empty);
        if props_a.len() != props_b.len() {
            return false;
        }
        let props_match = props_a.iter().all(|(name, prop_a)| {
            props_b
                .get(name)
                .is_some_and(|prop_b| schemas_equal(prop_a, prop_b))
        });
        if !props_match {
            return false;
        }
    }

    if a.is(SchemaType::Array) {
        match (&a.items, &b.items) {
            (None, None) => {}
            (Some(x), Some(y)) if schemas_equal(x, y) => {}
            _ => return false,
        }
    }

    a.enum_values == b.enum_values
}

// ============================================================================
// Request Body / Response Merging
// ============================================================================

/// Merge request bodies observed for one endpoint
///
/// Content types are unioned, schemas merged per shared content type under
/// `policy`; the result is required if any input was. `None` for an empty
/// slice.
pub fn merge_request_bodies(
    bodies: &[RequestBody],
    policy: RequiredPolicy,
) -> Option<RequestBody> {
    let (first, rest) = bodies.split_first()?;
    if rest.is_empty() {
        return Some(first.clone());
    }

    let mut merged = RequestBody {
        description: first.description.clone(),
        content: BTreeMap::new(),
        required: bodies.iter().any(|body| body.required),
    };

    for body in bodies {
        merge_content(&mut merged.content, &body.content, policy);
    }

    Some(merged)
}

/// Merge responses observed for one status code
///
/// Content types and headers are unioned, schemas merged per shared key
/// under `policy`.
pub fn merge_responses(responses: &[Response], policy: RequiredPolicy) -> Response {
    let Some((first, rest)) = responses.split_first() else {
        return Response::default();
    };
    if rest.is_empty() {
        return first.clone();
    }

    let mut merged = Response::new(first.description.clone());
    for response in responses {
        merge_content(&mut merged.content, &response.content, policy);
        merge_headers(&mut merged.headers, &response.headers, policy);
    }

    merged
}

fn merge_content(
    into: &mut BTreeMap<String, MediaType>,
    from: &BTreeMap<String, MediaType>,
    policy: RequiredPolicy,
) {
    for (content_type, media) in from {
        let combined = match into.get(content_type) {
            Some(existing) => MediaType {
                schema: merge_schema_with(&existing.schema, &media.schema, policy),
                example: media.example.clone().or_else(|| existing.example.clone()),
            },
            None => media.clone(),
        };
        into.insert(content_type.clone(), combined);
    }
}

fn merge_headers(
    into: &mut BTreeMap<String, Header>,
    from: &BTreeMap<String, Header>,
    policy: RequiredPolicy,
) {
    for (name, header) in from {
        let combined = match into.get(name) {
            Some(existing) => Header {
                description: header.description.clone(),
                schema: merge_schema_with(&existing.schema, &header.schema, policy),
            },
            None => header.clone(),
        };
        into.insert(name.clone(), combined);
    }
}

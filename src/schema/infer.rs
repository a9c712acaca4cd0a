//! Schema inference from single JSON values

use super::format::{detect_date_structure, FormatDetector};
use super::types::{Format, Schema, SchemaType};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::collections::{BTreeMap, BTreeSet};

/// What an empty array contributes as its `items` schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyArrayItems {
    /// Leave `items` unset: no element has been observed yet
    #[default]
    Absent,
    /// Use a concrete `{type: string}` placeholder
    String,
}

/// How string formats are detected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatDetection {
    /// Only parse-based date / date-time detection
    #[default]
    Structural,
    /// Full pattern table of the [`FormatDetector`]
    Patterns,
}

/// Value type inferrer with per-call-site policies
///
/// Inference is total: every JSON value yields a schema.
#[derive(Debug, Clone)]
pub struct ValueInferrer {
    format_detection: FormatDetection,
    /// Mark `null` values as `nullable`
    null_is_nullable: bool,
    /// Mark every present, non-null object key as required
    require_present_keys: bool,
    empty_array_items: EmptyArrayItems,
    detector: FormatDetector,
}

impl Default for ValueInferrer {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueInferrer {
    /// Create an inferrer with structural format detection and no
    /// nullability or required marking
    pub fn new() -> Self {
        Self {
            format_detection: FormatDetection::Structural,
            null_is_nullable: false,
            require_present_keys: false,
            empty_array_items: EmptyArrayItems::Absent,
            detector: FormatDetector::new(),
        }
    }

    /// Inferrer used for whole request/response bodies: nulls are nullable
    /// and every key seen in the body is required.
    pub fn for_transactions(empty_array_items: EmptyArrayItems) -> Self {
        Self::new()
            .with_nullable_nulls(true)
            .with_required_keys(true)
            .with_empty_array_items(empty_array_items)
    }

    /// Set the format detection mode
    #[must_use]
    pub fn with_format_detection(mut self, detection: FormatDetection) -> Self {
        self.format_detection = detection;
        self
    }

    /// Enable/disable marking `null` values as nullable
    #[must_use]
    pub fn with_nullable_nulls(mut self, enabled: bool) -> Self {
        self.null_is_nullable = enabled;
        self
    }

    /// Enable/disable marking present object keys as required
    #[must_use]
    pub fn with_required_keys(mut self, enabled: bool) -> Self {
        self.require_present_keys = enabled;
        self
    }

    /// Set the empty-array policy
    #[must_use]
    pub fn with_empty_array_items(mut self, policy: EmptyArrayItems) -> Self {
        self.empty_array_items = policy;
        self
    }

    /// Infer a schema from a single JSON value
    pub fn infer(&self, value: &Value) -> Schema {
        match value {
            Value::Null => Schema::new(SchemaType::Null).with_nullable(self.null_is_nullable),
            Value::Bool(b) => Schema::new(SchemaType::Boolean).with_example(Value::Bool(*b)),
            Value::Number(n) => infer_number(n),
            Value::String(s) => self.infer_string(s),
            Value::Array(arr) => self.infer_array(arr),
            Value::Object(map) => self.infer_object(map),
        }
    }

    fn infer_string(&self, s: &str) -> Schema {
        let mut schema = Schema::new(SchemaType::String).with_example(Value::String(s.to_string()));
        schema.format = match self.format_detection {
            FormatDetection::Structural => detect_date_structure(s),
            FormatDetection::Patterns => self.detector.detect(s),
        };
        schema
    }

    fn infer_array(&self, arr: &[Value]) -> Schema {
        let items = match arr.first() {
            Some(first) => Some(self.infer(first)),
            None => match self.empty_array_items {
                EmptyArrayItems::Absent => None,
                EmptyArrayItems::String => Some(Schema::new(SchemaType::String)),
            },
        };
        Schema::array(items)
    }

    fn infer_object(&self, map: &serde_json::Map<String, Value>) -> Schema {
        let mut properties = BTreeMap::new();
        let mut required = BTreeSet::new();

        for (key, val) in map {
            properties.insert(key.clone(), self.infer(val));
            if self.require_present_keys && !val.is_null() {
                required.insert(key.clone());
            }
        }

        let mut schema = Schema::object(properties);
        schema.required = required;
        schema
    }
}

/// Infer a schema from a single JSON value (convenience function)
pub fn infer_schema(value: &Value) -> Schema {
    ValueInferrer::new().infer(value)
}

/// Type [`ValueInferrer::infer`] assigns to `value`, without building the schema
pub(crate) fn value_type(value: &Value) -> SchemaType {
    match value {
        Value::Null => SchemaType::Null,
        Value::Bool(_) => SchemaType::Boolean,
        Value::Number(n) if integral_value(n).is_some() => SchemaType::Integer,
        Value::Number(n) if n.as_f64().is_some() => SchemaType::Number,
        Value::Number(_) | Value::String(_) => SchemaType::String,
        Value::Array(_) => SchemaType::Array,
        Value::Object(_) => SchemaType::Object,
    }
}

/// The value of `n` as an `i64` when it has no fractional part
pub(crate) fn integral_value(n: &Number) -> Option<i64> {
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    if n.is_u64() {
        // above i64::MAX
        return None;
    }
    let f = n.as_f64()?;
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

fn infer_number(n: &Number) -> Schema {
    if let Some(i) = integral_value(n) {
        return Schema::new(SchemaType::Integer)
            .with_format(Format::Int64)
            .with_example(Value::from(i));
    }

    match n.as_f64() {
        Some(f) => Schema::new(SchemaType::Number)
            .with_format(Format::Double)
            .with_example(Value::from(f)),
        // Not representable as f64: keep the literal text
        None => Schema::new(SchemaType::String).with_example(Value::String(n.to_string())),
    }
}

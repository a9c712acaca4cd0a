//! Sample-driven schema refinement
//!
//! The refiner looks at every sample collected for a field path and
//! improves on what a single value can say: enums for repeated short
//! strings, integer ranges, per-property nullability and `required`, and a
//! dominant type when samples disagree.

use super::format::FormatDetector;
use super::infer::{integral_value, value_type, FormatDetection, ValueInferrer};
use super::samples::{items_path, property_path, SampleCollector};
use super::types::{Format, Schema, SchemaType};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::debug;

/// Enum detection only runs for sample counts in `2..=MAX_ENUM_SAMPLES`
const MAX_ENUM_SAMPLES: usize = 10;

/// Maximum number of distinct values for an enum
const MAX_ENUM_MEMBERS: usize = 5;

/// Enum members must be strictly shorter than this (in characters)
const MAX_ENUM_LEN: usize = 30;

/// Numeric range classification needs at least this many samples
const MIN_NUMERIC_SAMPLES: usize = 3;

/// Share of samples the dominant kind needs to win a mixed-type field
const DOMINANCE_THRESHOLD: f64 = 0.7;

/// Refines schemas from the samples collected per field path
///
/// Object and array refinement propagate child values into derived paths
/// (`path.prop`, `path[]`). Propagation is tracked per parent path, so
/// calling [`infer_schema`](Self::infer_schema) again never feeds the same
/// parent sample's children twice.
#[derive(Debug, Clone)]
pub struct SchemaRefiner {
    collector: SampleCollector,
    inferrer: ValueInferrer,
    detector: &'static FormatDetector,
    /// Parent samples already propagated, keyed by `path.` / `path[]`
    propagated: HashMap<String, usize>,
}

impl Default for SchemaRefiner {
    fn default() -> Self {
        Self::new(0)
    }
}

impl SchemaRefiner {
    /// Create a refiner keeping at most `max_samples` per path (`0` = default)
    pub fn new(max_samples: usize) -> Self {
        Self {
            collector: SampleCollector::new(max_samples),
            inferrer: ValueInferrer::new().with_format_detection(FormatDetection::Patterns),
            detector: FormatDetector::shared(),
            propagated: HashMap::new(),
        }
    }

    /// Per-path sample cap
    pub fn max_samples(&self) -> usize {
        self.collector.max_samples()
    }

    /// Record a raw sample for `path`
    pub fn add_sample(&mut self, path: &str, value: Value) -> bool {
        self.collector.add_sample(path, value)
    }

    /// Samples currently held for `path`
    pub fn samples(&self, path: &str) -> &[Value] {
        self.collector.samples(path)
    }

    /// Drop all samples
    pub fn reset(&mut self) {
        self.collector.reset();
        self.propagated.clear();
    }

    /// Refined schema for `path`, `None` when nothing was sampled there
    pub fn infer_schema(&mut self, path: &str) -> Option<Schema> {
        let samples = self.collector.samples(path).to_vec();
        let first = samples.first()?;

        let first_type = value_type(first);
        let homogeneous = samples[1..]
            .iter()
            .all(|sample| value_type(sample) == first_type);

        let schema = if homogeneous {
            let initial = self.inferrer.infer(first);
            self.enhance(path, initial, &samples)
        } else {
            self.infer_mixed(path, &samples)
        };
        Some(schema)
    }

    fn enhance(&mut self, path: &str, schema: Schema, samples: &[Value]) -> Schema {
        match schema.schema_type {
            Some(SchemaType::String) => self.enhance_string(schema, samples),
            Some(SchemaType::Integer | SchemaType::Number) => enhance_number(schema, samples),
            Some(SchemaType::Array) => self.enhance_array(path, schema),
            Some(SchemaType::Object) => self.infer_object_properties(path),
            _ => schema,
        }
    }

    fn enhance_string(&self, mut schema: Schema, samples: &[Value]) -> Schema {
        if (2..=MAX_ENUM_SAMPLES).contains(&samples.len()) {
            let strings: Vec<&str> = samples.iter().filter_map(Value::as_str).collect();

            let mut distinct: Vec<&str> = Vec::new();
            for s in &strings {
                if !distinct.contains(s) {
                    distinct.push(s);
                }
            }
            let all_short = strings.iter().all(|s| s.chars().count() < MAX_ENUM_LEN);

            if distinct.len() <= MAX_ENUM_MEMBERS && all_short && distinct.len() < strings.len() {
                schema.enum_values = distinct
                    .into_iter()
                    .map(|s| Value::String(s.to_string()))
                    .collect();
            }
        }

        if schema.format.is_none() {
            if let Some(first) = samples.first().and_then(Value::as_str) {
                schema.format = self.detector.detect(first);
            }
        }

        schema
    }

    fn enhance_array(&mut self, path: &str, mut schema: Schema) -> Schema {
        let items_path = items_path(path);
        self.propagate_items(path, &items_path);

        let items = self.collector.samples(&items_path).to_vec();
        let Some(first) = items.first() else {
            return schema;
        };

        let first_type = value_type(first);
        let item_schema = if items.iter().all(|item| value_type(item) == first_type) {
            let initial = self.inferrer.infer(first);
            self.enhance(&items_path, initial, &items)
        } else {
            debug!("Mixed item types at {}, using opaque items", items_path);
            Schema::opaque()
        };

        schema.items = Some(Box::new(item_schema));
        schema
    }

    fn infer_mixed(&mut self, path: &str, samples: &[Value]) -> Schema {
        let tally = KindTally::count(samples);
        let total = samples.len();
        let nullable = tally.null > 0 && tally.null < total;

        let dominant = tally
            .dominant()
            .filter(|(_, count)| *count as f64 / total as f64 > DOMINANCE_THRESHOLD);

        let Some((dominant_type, _)) = dominant else {
            debug!("No dominant type among {} samples at {}, marking opaque", total, path);
            return Schema::opaque().with_nullable(nullable);
        };

        let schema = match dominant_type {
            SchemaType::Object => self.infer_object_properties(path),
            SchemaType::Array => Schema::array(self.infer_array_items(path)),
            SchemaType::String => {
                let mut schema = Schema::new(SchemaType::String);
                schema.format = samples
                    .iter()
                    .filter_map(Value::as_str)
                    .find_map(|s| self.detector.detect(s));
                schema
            }
            SchemaType::Integer => Schema::new(SchemaType::Integer).with_format(Format::Int64),
            SchemaType::Number => Schema::new(SchemaType::Number).with_format(Format::Double),
            other => Schema::new(other),
        };

        schema.with_nullable(nullable)
    }

    fn infer_array_items(&mut self, path: &str) -> Option<Schema> {
        let items_path = items_path(path);
        self.propagate_items(path, &items_path);
        self.infer_schema(&items_path)
    }

    /// Union of the properties of every object sample at `path`
    ///
    /// A property is nullable when some object lacks it or holds `null` for
    /// it; it is required when every object holds a non-null value.
    fn infer_object_properties(&mut self, path: &str) -> Schema {
        for sample in self.unpropagated(path, format!("{path}.")) {
            if let Value::Object(map) = sample {
                for (name, value) in map {
                    self.collector.add_sample(&property_path(path, &name), value);
                }
            }
        }

        // name -> (present, non-null)
        let mut counts: BTreeMap<String, (usize, usize)> = BTreeMap::new();
        let mut object_count = 0;
        for sample in self.collector.samples(path) {
            if let Value::Object(map) = sample {
                object_count += 1;
                for (name, value) in map {
                    let entry = counts.entry(name.clone()).or_default();
                    entry.0 += 1;
                    if !value.is_null() {
                        entry.1 += 1;
                    }
                }
            }
        }

        let mut properties = BTreeMap::new();
        let mut required = BTreeSet::new();
        for (name, (present, non_null)) in counts {
            let mut property = if non_null == 0 {
                Schema::null()
            } else {
                self.infer_schema(&property_path(path, &name))
                    .unwrap_or_else(Schema::null)
            };

            if present < object_count || (non_null > 0 && non_null < present) {
                property.nullable = true;
            }
            if non_null == object_count {
                required.insert(name.clone());
            }
            properties.insert(name, property);
        }

        let mut schema = Schema::object(properties);
        schema.required = required;
        schema
    }

    fn propagate_items(&mut self, path: &str, items_path: &str) {
        for sample in self.unpropagated(path, items_path.to_string()) {
            if let Value::Array(items) = sample {
                for item in items {
                    self.collector.add_sample(items_path, item);
                }
            }
        }
    }

    /// Samples at `path` not yet propagated under `key`; advances the mark
    fn unpropagated(&mut self, path: &str, key: String) -> Vec<Value> {
        let samples = self.collector.samples(path);
        let mark = self.propagated.entry(key).or_insert(0);
        let fresh = samples.iter().skip(*mark).cloned().collect();
        *mark = samples.len();
        fresh
    }
}

fn enhance_number(mut schema: Schema, samples: &[Value]) -> Schema {
    if samples.len() < MIN_NUMERIC_SAMPLES {
        return schema;
    }

    let numbers: Vec<&serde_json::Number> = samples
        .iter()
        .filter_map(|sample| match sample {
            Value::Number(n) => Some(n),
            _ => None,
        })
        .collect();

    let all_integral = numbers.iter().all(|n| integral_value(n).is_some());
    let (min, max) = numbers
        .iter()
        .filter_map(|n| n.as_f64())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    if all_integral {
        schema.schema_type = Some(SchemaType::Integer);
        schema.format = Some(if min >= 0.0 && max <= 255.0 {
            Format::Int32
        } else {
            Format::Int64
        });
    } else {
        schema.schema_type = Some(SchemaType::Number);
        schema.format = Some(Format::Double);
    }

    schema
}

/// Per-kind sample counts for the mixed-type branch
#[derive(Debug, Default)]
struct KindTally {
    null: usize,
    string: usize,
    number: usize,
    integer: usize,
    boolean: usize,
    object: usize,
    array: usize,
}

impl KindTally {
    fn count(samples: &[Value]) -> Self {
        let mut tally = Self::default();
        for sample in samples {
            match sample {
                Value::Null => tally.null += 1,
                Value::String(_) => tally.string += 1,
                Value::Number(n) => {
                    tally.number += 1;
                    if integral_value(n).is_some() {
                        tally.integer += 1;
                    }
                }
                Value::Bool(_) => tally.boolean += 1,
                Value::Object(_) => tally.object += 1,
                Value::Array(_) => tally.array += 1,
            }
        }
        tally
    }

    /// Kind with the strictly highest count; earlier kinds win ties
    fn dominant(&self) -> Option<(SchemaType, usize)> {
        let numeric = if self.integer == self.number {
            SchemaType::Integer
        } else {
            SchemaType::Number
        };

        let candidates = [
            (SchemaType::String, self.string),
            (numeric, self.number),
            (SchemaType::Boolean, self.boolean),
            (SchemaType::Object, self.object),
            (SchemaType::Array, self.array),
        ];

        let mut best: Option<(SchemaType, usize)> = None;
        for (kind, count) in candidates {
            if count > best.map_or(0, |(_, c)| c) {
                best = Some((kind, count));
            }
        }
        best
    }
}

// ============================================================================
// Applying refinements to existing schemas
// ============================================================================

/// Refine `schema` with a throwaway sampler over `samples`
///
/// Returns `schema` unchanged when the samples yield nothing.
pub fn apply_type_inference(schema: Schema, samples: &[Value], max_samples: usize) -> Schema {
    const ROOT: &str = "root";

    let mut refiner = SchemaRefiner::new(max_samples);
    for sample in samples {
        refiner.add_sample(ROOT, sample.clone());
    }

    match refiner.infer_schema(ROOT) {
        Some(improved) => merge_with_improvement(schema, &improved),
        None => schema,
    }
}

/// Fill gaps in `original` from `improved`
///
/// Only absent information is taken over: type, format, enum, example,
/// missing properties and missing items. Existing properties and items are
/// improved recursively. Nullability always stays as in `original`.
///
/// The one exception is numeric width: when both sides have the same numeric
/// type, the refined `int32`/`int64`/`double` replaces the single-value
/// default, since only the samples show the observed range.
pub fn merge_with_improvement(original: Schema, improved: &Schema) -> Schema {
    let mut result = original;

    if result.schema_type.is_none() {
        result.schema_type = improved.schema_type;
    }
    if result.format.is_none() {
        result.format = improved.format;
    } else if result.schema_type == improved.schema_type
        && is_numeric_width(result.format)
        && is_numeric_width(improved.format)
    {
        result.format = improved.format;
    }
    if result.enum_values.is_empty() && !improved.enum_values.is_empty() {
        result.enum_values.clone_from(&improved.enum_values);
    }
    if result.example.is_none() {
        result.example.clone_from(&improved.example);
    }

    if result.is(SchemaType::Object) && improved.is(SchemaType::Object) {
        let properties = result.properties.get_or_insert_with(BTreeMap::new);
        if let Some(improved_props) = &improved.properties {
            for (name, improved_prop) in improved_props {
                let merged = match properties.remove(name) {
                    Some(existing) => merge_with_improvement(existing, improved_prop),
                    None => improved_prop.clone(),
                };
                properties.insert(name.clone(), merged);
            }
        }
    }

    if result.is(SchemaType::Array) && improved.is(SchemaType::Array) {
        result.items = match (result.items.take(), &improved.items) {
            (Some(existing), Some(better)) => Some(Box::new(merge_with_improvement(*existing, better))),
            (None, Some(better)) => Some(better.clone()),
            (existing, None) => existing,
        };
    }

    result
}

fn is_numeric_width(format: Option<Format>) -> bool {
    matches!(format, Some(Format::Int32 | Format::Int64 | Format::Double))
}

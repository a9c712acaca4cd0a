//! Schema inference, refinement and merging tests

use super::*;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::collections::BTreeSet;
use test_case::test_case;

fn names(set: &BTreeSet<String>) -> Vec<&str> {
    set.iter().map(String::as_str).collect()
}

fn enum_set(schema: &Schema) -> BTreeSet<String> {
    schema.enum_values.iter().map(Value::to_string).collect()
}

fn refine(path: &str, samples: &[Value]) -> Schema {
    let mut refiner = SchemaRefiner::new(10);
    for sample in samples {
        refiner.add_sample(path, sample.clone());
    }
    refiner.infer_schema(path).unwrap()
}

// ============================================================================
// Value Inference
// ============================================================================

#[test]
fn test_infer_simple_object() {
    let value = json!({
        "name": "John",
        "age": 30,
        "active": true
    });

    let schema = infer_schema(&value);

    assert!(schema.is(SchemaType::Object));
    assert_eq!(schema.properties.as_ref().unwrap().len(), 3);
    assert!(schema.property("name").unwrap().is(SchemaType::String));
    assert!(schema.property("age").unwrap().is(SchemaType::Integer));
    assert!(schema.property("active").unwrap().is(SchemaType::Boolean));
    assert_eq!(schema.property("active").unwrap().example, Some(json!(true)));
    // plain inference never marks anything required
    assert!(schema.required.is_empty());
}

#[test]
fn test_integral_float_is_integer() {
    let schema = infer_schema(&json!(42.0));
    assert_eq!(schema.schema_type, Some(SchemaType::Integer));
    assert_eq!(schema.format, Some(Format::Int64));
    assert_eq!(schema.example, Some(json!(42)));
}

#[test]
fn test_fractional_float_is_number() {
    let schema = infer_schema(&json!(42.5));
    assert_eq!(schema.schema_type, Some(SchemaType::Number));
    assert_eq!(schema.format, Some(Format::Double));
    assert_eq!(schema.example, Some(json!(42.5)));
}

#[test]
fn test_large_unsigned_is_number() {
    let schema = infer_schema(&json!(u64::MAX));
    assert_eq!(schema.schema_type, Some(SchemaType::Number));
}

#[test]
fn test_infer_null() {
    let schema = infer_schema(&Value::Null);
    assert_eq!(schema.schema_type, Some(SchemaType::Null));
    assert!(!schema.nullable);

    let schema = ValueInferrer::new().with_nullable_nulls(true).infer(&Value::Null);
    assert!(schema.nullable);
}

#[test]
fn test_infer_array_uses_first_element() {
    let schema = infer_schema(&json!([{"id": 1}, "ignored"]));

    let items = schema.items.as_ref().unwrap();
    assert!(items.is(SchemaType::Object));
    assert!(items.property("id").unwrap().is(SchemaType::Integer));
}

#[test]
fn test_empty_array_items_policy() {
    let absent = infer_schema(&json!([]));
    assert!(absent.is(SchemaType::Array));
    assert!(absent.items.is_none());

    let concrete = ValueInferrer::new()
        .with_empty_array_items(EmptyArrayItems::String)
        .infer(&json!([]));
    assert_eq!(concrete.items.as_deref(), Some(&Schema::new(SchemaType::String)));
}

#[test]
fn test_structural_string_formats() {
    assert_eq!(infer_schema(&json!("2024-01-15")).format, Some(Format::Date));
    assert_eq!(
        infer_schema(&json!("2024-01-15T10:30:00Z")).format,
        Some(Format::DateTime)
    );
    // no pattern table in plain inference
    assert_eq!(infer_schema(&json!("john@example.com")).format, None);

    let patterns = ValueInferrer::new().with_format_detection(FormatDetection::Patterns);
    assert_eq!(
        patterns.infer(&json!("john@example.com")).format,
        Some(Format::Email)
    );
}

#[test]
fn test_transaction_inferrer_marks_required() {
    let inferrer = ValueInferrer::for_transactions(EmptyArrayItems::Absent);
    let schema = inferrer.infer(&json!({"id": 1, "name": null, "tags": []}));

    assert_eq!(names(&schema.required), vec!["id", "tags"]);
    let name = schema.property("name").unwrap();
    assert!(name.is(SchemaType::Null));
    assert!(name.nullable);
}

// ============================================================================
// Format Detection
// ============================================================================

#[test_case("550e8400-e29b-41d4-a716-446655440000", Some(Format::Uuid) ; "uuid")]
#[test_case("user@example.com", Some(Format::Email) ; "email")]
#[test_case("https://example.com/users?page=2", Some(Format::Uri) ; "uri")]
#[test_case("2024-01-15", Some(Format::Date) ; "date")]
#[test_case("14:30:00", Some(Format::Time) ; "time")]
#[test_case("14:30:00.123+02:00", Some(Format::Time) ; "time with offset")]
#[test_case("2024-01-15T10:30:00Z", Some(Format::DateTime) ; "date time")]
#[test_case("2024-01-15T10:30:00.5+02:00", Some(Format::DateTime) ; "date time with offset")]
#[test_case("192.168.1.1", Some(Format::Ipv4) ; "ipv4")]
#[test_case("2001:0db8:85a3:0000:0000:8a2e:0370:7334", Some(Format::Ipv6) ; "ipv6 full")]
#[test_case("fe80::1", Some(Format::Ipv6) ; "ipv6 compressed")]
#[test_case("3.14", Some(Format::Numeric) ; "numeric")]
#[test_case("12345", Some(Format::Numeric) ; "integer string")]
#[test_case("hello world", None ; "plain")]
#[test_case("", None ; "empty")]
fn test_format_detection(input: &str, expected: Option<Format>) {
    assert_eq!(FormatDetector::new().detect(input), expected);
}

#[test]
fn test_format_detection_order() {
    // date matches before the parse fallbacks and the numeric check
    assert_eq!(FormatDetector::shared().detect("2024-01-15"), Some(Format::Date));
    // upper-case hex is not a uuid
    assert_eq!(
        FormatDetector::shared().detect("550E8400-E29B-41D4-A716-446655440000"),
        None
    );
}

#[test_case("2024-01-15", Some(Format::Date) ; "dashed date")]
#[test_case("2024/01/15", Some(Format::Date) ; "slashed date")]
#[test_case("2024-01-15T10:30:00", Some(Format::DateTime) ; "naive date time")]
#[test_case("2024-01-15T10:30:00+01:00", Some(Format::DateTime) ; "rfc3339")]
#[test_case("2024-13-45", None ; "invalid date")]
#[test_case("yesterday", None ; "word")]
fn test_detect_date_structure(input: &str, expected: Option<Format>) {
    assert_eq!(detect_date_structure(input), expected);
}

// ============================================================================
// Sample Collection
// ============================================================================

#[test]
fn test_sample_collector_skips_nulls() {
    let mut collector = SampleCollector::new(5);
    assert!(!collector.add_sample("a", Value::Null));
    assert!(collector.add_sample("a", json!(1)));
    assert_eq!(collector.samples("a"), &[json!(1)]);
    assert!(collector.samples("missing").is_empty());
}

#[test]
fn test_sample_collector_cap() {
    let mut collector = SampleCollector::new(2);
    collector.add_sample("a", json!(1));
    collector.add_sample("a", json!(1));
    assert!(!collector.add_sample("a", json!(3)));

    // duplicates are kept, order preserved
    assert_eq!(collector.samples("a"), &[json!(1), json!(1)]);
}

#[test]
fn test_sample_collector_zero_cap_uses_default() {
    let collector = SampleCollector::new(0);
    assert_eq!(collector.max_samples(), DEFAULT_MAX_SAMPLES);
    assert_eq!(effective_max_samples(3), 3);
}

#[test]
fn test_sample_collector_reset() {
    let mut collector = SampleCollector::default();
    collector.add_sample("a", json!("x"));
    collector.add_sample("b", json!("y"));
    assert_eq!(collector.path_count(), 2);

    collector.reset();
    assert_eq!(collector.path_count(), 0);
    assert!(!collector.has_samples("a"));
}

// ============================================================================
// Refinement
// ============================================================================

#[test]
fn test_refine_without_samples() {
    let mut refiner = SchemaRefiner::default();
    assert!(refiner.infer_schema("nothing").is_none());
}

#[test]
fn test_refine_detects_enum() {
    let schema = refine(
        "color",
        &[
            json!("red"),
            json!("green"),
            json!("blue"),
            json!("red"),
            json!("green"),
        ],
    );

    assert!(schema.is(SchemaType::String));
    assert_eq!(schema.enum_values, vec![json!("red"), json!("green"), json!("blue")]);
}

#[test]
fn test_refine_no_enum_for_distinct_values() {
    let samples: Vec<Value> = ["a", "b", "c", "d", "e", "f"]
        .iter()
        .map(|s| json!(s))
        .collect();
    let schema = refine("letter", &samples);
    assert!(schema.enum_values.is_empty());

    // no repetition, no enum
    let schema = refine("pair", &[json!("x"), json!("y")]);
    assert!(schema.enum_values.is_empty());
}

#[test]
fn test_refine_no_enum_for_long_strings() {
    let long = "a".repeat(30);
    let schema = refine("text", &[json!(long), json!(long)]);
    assert!(schema.enum_values.is_empty());
}

#[test]
fn test_refine_string_format() {
    let schema = refine("email", &[json!("a@example.com"), json!("b@example.com")]);
    assert_eq!(schema.format, Some(Format::Email));
}

#[test_case(&[json!(1), json!(20), json!(255)], SchemaType::Integer, Format::Int32 ; "byte range")]
#[test_case(&[json!(1), json!(1000), json!(5)], SchemaType::Integer, Format::Int64 ; "above byte range")]
#[test_case(&[json!(-1), json!(2), json!(3)], SchemaType::Integer, Format::Int64 ; "negative")]
#[test_case(&[json!(1.5), json!(2.5), json!(3.5)], SchemaType::Number, Format::Double ; "fractional")]
#[test_case(&[json!(1), json!(2)], SchemaType::Integer, Format::Int64 ; "too few samples")]
fn test_refine_numeric_range(samples: &[Value], schema_type: SchemaType, format: Format) {
    let schema = refine("n", samples);
    assert_eq!(schema.schema_type, Some(schema_type));
    assert_eq!(schema.format, Some(format));
}

#[test]
fn test_refine_object_property_nullability() {
    let schema = refine(
        "user",
        &[
            json!({"id": 1, "name": "Alice"}),
            json!({"id": 2, "name": "Bob", "email": "bob@x.com"}),
        ],
    );

    let properties = schema.properties.as_ref().unwrap();
    assert_eq!(properties.len(), 3);
    assert!(properties["email"].nullable);
    assert!(!properties["id"].nullable);
    assert!(!properties["name"].nullable);
    assert_eq!(names(&schema.required), vec!["id", "name"]);
}

#[test]
fn test_refine_property_only_null() {
    let schema = refine(
        "row",
        &[json!({"a": 1, "b": null}), json!({"a": 2, "b": null})],
    );

    let b = schema.property("b").unwrap();
    assert!(b.is(SchemaType::Null));
    assert!(b.nullable);
    assert_eq!(names(&schema.required), vec!["a"]);
}

#[test]
fn test_refine_sometimes_null_property() {
    let schema = refine(
        "row",
        &[json!({"a": 1}), json!({"a": null}), json!({"a": 3})],
    );

    let a = schema.property("a").unwrap();
    assert!(a.is(SchemaType::Integer));
    assert!(a.nullable);
    assert!(schema.required.is_empty());
}

#[test]
fn test_refine_mixed_dominant_type() {
    let schema = refine("value", &[json!(1), json!(2), json!(3), json!("x")]);
    assert_eq!(schema.schema_type, Some(SchemaType::Integer));
}

#[test]
fn test_refine_mixed_without_majority() {
    let schema = refine("value", &[json!(1), json!("a"), json!(true)]);
    assert_eq!(schema, Schema::opaque());
}

#[test]
fn test_refine_mixed_numbers() {
    let schema = refine("value", &[json!(1), json!(2.5), json!(3), json!(4)]);
    assert_eq!(schema.schema_type, Some(SchemaType::Number));
    assert_eq!(schema.format, Some(Format::Double));
}

#[test]
fn test_refine_array_items() {
    let schema = refine("tags", &[json!([1, 2]), json!([3])]);

    let items = schema.items.as_ref().unwrap();
    assert_eq!(items.schema_type, Some(SchemaType::Integer));
    assert_eq!(items.format, Some(Format::Int32));
}

#[test]
fn test_refine_mixed_array_items_are_opaque() {
    let schema = refine("values", &[json!([1, "a"])]);
    assert_eq!(schema.items.as_deref(), Some(&Schema::opaque()));
}

#[test]
fn test_refine_array_of_objects() {
    let schema = refine(
        "users",
        &[json!([{"id": 1}]), json!([{"id": 2, "nick": "bo"}])],
    );

    let items = schema.items.as_ref().unwrap();
    assert!(items.is(SchemaType::Object));
    assert!(items.property("nick").unwrap().nullable);
    assert_eq!(names(&items.required), vec!["id"]);
}

#[test]
fn test_refine_nested_paths() {
    let mut refiner = SchemaRefiner::new(10);
    refiner.add_sample("body", json!({"address": {"city": "Oslo"}}));
    refiner.add_sample("body", json!({"address": {"city": "Rome"}}));

    let schema = refiner.infer_schema("body").unwrap();
    let city = schema
        .property("address")
        .and_then(|address| address.property("city"))
        .unwrap();
    assert!(city.is(SchemaType::String));
    assert_eq!(refiner.samples("body.address.city").len(), 2);
}

#[test]
fn test_refine_rerun_does_not_duplicate_children() {
    let mut refiner = SchemaRefiner::new(10);
    refiner.add_sample("user", json!({"id": 1}));
    refiner.add_sample("user", json!({"id": 2}));

    let first = refiner.infer_schema("user").unwrap();
    let second = refiner.infer_schema("user").unwrap();

    assert_eq!(first, second);
    assert_eq!(refiner.samples("user.id").len(), 2);
}

#[test]
fn test_refiner_reset() {
    let mut refiner = SchemaRefiner::new(10);
    refiner.add_sample("x", json!(1));
    refiner.reset();
    assert!(refiner.infer_schema("x").is_none());
}

#[test]
fn test_apply_type_inference() {
    let schema = infer_schema(&json!("a@example.com"));
    assert_eq!(schema.format, None);

    let improved = apply_type_inference(
        schema.clone(),
        &[json!("a@example.com"), json!("b@example.com")],
        10,
    );
    assert_eq!(improved.format, Some(Format::Email));
    assert_eq!(improved.example, schema.example);

    assert_eq!(apply_type_inference(schema.clone(), &[], 10), schema);
}

#[test]
fn test_merge_with_improvement() {
    let original = infer_schema(&json!({"id": 1, "nested": {"a": "x"}})).with_nullable(true);
    let improved = refine(
        "root",
        &[
            json!({"id": 1, "nested": {"a": "x", "b": true}, "extra": "y"}),
            json!({"id": 2, "nested": {"a": "z"}}),
        ],
    );

    let merged = merge_with_improvement(original, &improved);

    assert!(merged.nullable);
    assert!(merged.property("extra").is_some());
    // existing properties gain missing children
    assert!(merged.property("nested").unwrap().property("b").is_some());
    // existing information is kept
    assert_eq!(merged.property("id").unwrap().format, Some(Format::Int64));
}

#[test]
fn test_merge_with_improvement_takes_refined_width() {
    let samples = [json!({"count": 1}), json!({"count": 7}), json!({"count": 200})];
    let merged = samples
        .iter()
        .map(infer_schema)
        .fold(Schema::placeholder(), |acc, schema| merge_schema(&acc, &schema));
    assert_eq!(merged.property("count").unwrap().format, Some(Format::Int64));

    let refined = apply_type_inference(merged, &samples, 10);
    assert_eq!(refined.property("count").unwrap().format, Some(Format::Int32));

    // a string format is never replaced
    let email = Schema::new(SchemaType::String).with_format(Format::Email);
    let uri = Schema::new(SchemaType::String).with_format(Format::Uri);
    assert_eq!(merge_with_improvement(email, &uri).format, Some(Format::Email));
}

// ============================================================================
// Merging
// ============================================================================

#[test]
fn test_merge_single_schema_is_unchanged() {
    let schema = infer_schema(&json!({"id": 1, "tags": ["a"]}));

    let mut merger = SchemaMerger::new();
    merger.add_schema("/users", "GET", schema.clone());

    assert_eq!(merger.merge_schemas("/users", "GET"), schema);
    assert_eq!(merger.schema_count("/users", "GET"), 1);
}

#[test]
fn test_merge_no_schemas_is_placeholder() {
    let merger = SchemaMerger::new();
    assert!(merger.merge_schemas("/users", "GET").is_placeholder());
    assert!(merger.merge_response_schemas("/users", "GET").is_placeholder());
}

#[test]
fn test_merge_request_and_response_buckets_are_separate() {
    let mut merger = SchemaMerger::new();
    merger.add_schema("/users", "POST", infer_schema(&json!({"name": "x"})));
    merger.add_response_schema("/users", "POST", infer_schema(&json!({"id": 1})));

    let request = merger.merge_schemas("/users", "POST");
    let response = merger.merge_response_schemas("/users", "POST");
    assert!(request.property("id").is_none());
    assert!(response.property("name").is_none());
}

#[test]
fn test_merge_enum_union() {
    let mut a = Schema::new(SchemaType::String);
    a.enum_values = vec![json!("x"), json!("y")];
    let mut b = Schema::new(SchemaType::String);
    b.enum_values = vec![json!("y"), json!("z")];

    let from_empty = merge_schema(&merge_schema(&Schema::placeholder(), &a), &b);
    assert_eq!(from_empty.enum_values, vec![json!("x"), json!("y"), json!("z")]);

    assert_eq!(enum_set(&merge_schema(&a, &b)), enum_set(&merge_schema(&b, &a)));
}

#[test_case(true, false, true ; "left")]
#[test_case(false, true, true ; "right")]
#[test_case(true, true, true ; "both")]
#[test_case(false, false, false ; "neither")]
fn test_merge_nullable_or(a: bool, b: bool, expected: bool) {
    let a = Schema::new(SchemaType::String).with_nullable(a);
    let b = Schema::new(SchemaType::String).with_nullable(b);
    assert_eq!(merge_schema(&a, &b).nullable, expected);
}

#[test_case(SchemaType::String, SchemaType::Integer ; "string integer")]
#[test_case(SchemaType::Integer, SchemaType::Number ; "integer number")]
#[test_case(SchemaType::Array, SchemaType::Boolean ; "array boolean")]
#[test_case(SchemaType::Null, SchemaType::Object ; "null object")]
fn test_merge_type_conflict_escalates_to_object(a: SchemaType, b: SchemaType) {
    let merged = merge_schema(&Schema::new(a), &Schema::new(b));
    assert_eq!(merged.schema_type, Some(SchemaType::Object));
    assert!(merged.properties.is_some());

    let reversed = merge_schema(&Schema::new(b), &Schema::new(a));
    assert_eq!(reversed.schema_type, Some(SchemaType::Object));
}

#[test]
fn test_merge_escalation_drops_format_and_items() {
    let email = Schema::new(SchemaType::String).with_format(Format::Email);
    let list = infer_schema(&json!([1, 2]));

    let merged = merge_schema(&email, &list);
    assert_eq!(merged.schema_type, Some(SchemaType::Object));
    assert_eq!(merged.format, None);
    assert!(merged.items.is_none());

    let merged = merge_schema(&list, &email);
    assert_eq!(merged.schema_type, Some(SchemaType::Object));
    assert_eq!(merged.format, None);
    assert!(merged.items.is_none());
}

#[test]
fn test_merge_placeholder_adopts_type() {
    let merged = merge_schema(&Schema::placeholder(), &Schema::new(SchemaType::Integer));
    assert_eq!(merged.schema_type, Some(SchemaType::Integer));

    let merged = merge_schema(&Schema::new(SchemaType::Integer), &Schema::placeholder());
    assert_eq!(merged.schema_type, Some(SchemaType::Integer));
}

#[test]
fn test_merge_objects() {
    let inferrer = ValueInferrer::for_transactions(EmptyArrayItems::Absent);
    let a = inferrer.infer(&json!({"id": 1, "name": "x"}));
    let b = inferrer.infer(&json!({"id": 2.5, "email": "e@x.com"}));

    let merged = merge_schema(&a, &b);

    let properties = merged.properties.as_ref().unwrap();
    assert_eq!(properties.len(), 3);
    // integer then number conflicts inside the property
    assert_eq!(properties["id"].schema_type, Some(SchemaType::Object));
    assert_eq!(names(&merged.required), vec!["email", "id", "name"]);
}

#[test]
fn test_merge_required_intersection() {
    let inferrer = ValueInferrer::for_transactions(EmptyArrayItems::Absent);
    let a = inferrer.infer(&json!({"id": 1, "name": "x"}));
    let b = inferrer.infer(&json!({"id": 2, "email": "e@x.com"}));

    let merged = merge_schema_with(&a, &b, RequiredPolicy::Intersection);
    assert_eq!(names(&merged.required), vec!["id"]);

    let mut merger = SchemaMerger::new().with_required_policy(RequiredPolicy::Intersection);
    merger.add_schema("/u", "PUT", a);
    merger.add_schema("/u", "PUT", b);
    assert_eq!(names(&merger.merge_schemas("/u", "PUT").required), vec!["id"]);
}

#[test]
fn test_merge_array_items() {
    let empty = Schema::array(None);
    let ints = infer_schema(&json!([1]));
    let objects = infer_schema(&json!([{"a": 1}]));

    assert_eq!(merge_schema(&empty, &ints).items, ints.items);
    assert_eq!(merge_schema(&ints, &empty).items, ints.items);

    let merged = merge_schema(&objects, &infer_schema(&json!([{"b": "x"}])));
    let items = merged.items.as_ref().unwrap();
    assert!(items.property("a").is_some());
    assert!(items.property("b").is_some());
}

#[test]
fn test_merge_example_and_format_first_wins() {
    let a = Schema::new(SchemaType::String).with_example(json!("first"));
    let b = Schema::new(SchemaType::String)
        .with_example(json!("second"))
        .with_format(Format::Email);

    let merged = merge_schema(&a, &b);
    assert_eq!(merged.example, Some(json!("first")));
    assert_eq!(merged.format, Some(Format::Email));

    let merged = merge_schema(&b, &a.clone().with_format(Format::Uri));
    assert_eq!(merged.format, Some(Format::Email));
}

#[test]
fn test_schemas_equal() {
    let a = infer_schema(&json!({"id": 1, "tags": ["x"]}));
    let b = infer_schema(&json!({"id": 7, "tags": ["y"]}));
    assert!(schemas_equal(&a, &b));

    let c = infer_schema(&json!({"id": 1}));
    assert!(!schemas_equal(&a, &c));

    let mut x = Schema::new(SchemaType::String);
    x.enum_values = vec![json!("a"), json!("b")];
    let mut y = Schema::new(SchemaType::String);
    y.enum_values = vec![json!("b"), json!("a")];
    assert!(!schemas_equal(&x, &y));

    assert!(!schemas_equal(&Schema::array(None), &infer_schema(&json!([1]))));
}

#[test]
fn test_merge_request_bodies() {
    assert!(merge_request_bodies(&[], RequiredPolicy::Union).is_none());

    let mut optional = RequestBody::single("application/json", infer_schema(&json!({"a": 1})));
    optional.required = false;
    let form = RequestBody::single(
        "application/x-www-form-urlencoded",
        infer_schema(&json!({"f": "v"})),
    );
    let json_again = RequestBody::single("application/json", infer_schema(&json!({"b": true})));

    let merged =
        merge_request_bodies(&[optional, form, json_again], RequiredPolicy::Union).unwrap();

    assert!(merged.required);
    assert_eq!(merged.content.len(), 2);
    let schema = &merged.content["application/json"].schema;
    assert!(schema.property("a").is_some());
    assert!(schema.property("b").is_some());
}

#[test]
fn test_merge_responses() {
    assert_eq!(merge_responses(&[], RequiredPolicy::Union), Response::default());

    let a = Response::new("OK")
        .with_content("application/json", infer_schema(&json!({"id": 1})))
        .with_header("X-Request-Id", Schema::new(SchemaType::String));
    let b = Response::new("OK")
        .with_content("application/json", infer_schema(&json!({"name": "n"})))
        .with_header("X-Total", Schema::new(SchemaType::Integer));

    let merged = merge_responses(&[a, b], RequiredPolicy::Union);

    assert_eq!(merged.description, "OK");
    assert_eq!(merged.headers.len(), 2);
    let schema = &merged.content["application/json"].schema;
    assert!(schema.property("id").is_some());
    assert!(schema.property("name").is_some());
}

#[test]
fn test_merge_envelopes_with_intersection() {
    let transaction = ValueInferrer::for_transactions(EmptyArrayItems::Absent);
    let full = transaction.infer(&json!({"id": 1, "extra": true}));
    let partial = transaction.infer(&json!({"id": 2}));

    let bodies = [
        RequestBody::single("application/json", full.clone()),
        RequestBody::single("application/json", partial.clone()),
    ];
    let body = merge_request_bodies(&bodies, RequiredPolicy::Intersection).unwrap();
    assert_eq!(names(&body.content["application/json"].schema.required), vec!["id"]);

    let responses = [
        Response::new("Created").with_content("application/json", full),
        Response::new("Created").with_content("application/json", partial),
    ];
    let union = merge_responses(&responses, RequiredPolicy::Union);
    assert_eq!(
        names(&union.content["application/json"].schema.required),
        vec!["extra", "id"]
    );
    let intersection = merge_responses(&responses, RequiredPolicy::Intersection);
    assert_eq!(
        names(&intersection.content["application/json"].schema.required),
        vec!["id"]
    );
}

#[test]
fn test_schema_serialization() {
    let schema = ValueInferrer::for_transactions(EmptyArrayItems::Absent)
        .infer(&json!({"id": 1, "when": "2024-01-15"}));

    let value: Value = serde_json::from_str(&schema.to_json_pretty()).unwrap();
    assert_eq!(value["type"], "object");
    assert_eq!(value["properties"]["id"]["format"], "int64");
    assert_eq!(value["properties"]["when"]["format"], "date");
    assert_eq!(value["required"], json!(["id", "when"]));
    assert!(value["properties"]["id"].get("nullable").is_none());
}

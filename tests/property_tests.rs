//! Property-based tests for schema inference
//!
//! These tests use proptest to generate random documents and verify that
//! inference keeps its invariants for all of them.
//!
//! ```bash
//! PROPTEST_CASES=10000 cargo test --test property_tests
//! ```

use proptest::prelude::*;
use serde_json::{Value, json};

use schema_infer::inference::{
    IntegerFormat, SchemaInferrer, SchemaKind, SchemaNode, SourceKind, StringFormat, classify,
};

// =============================================================================
// Test Strategies
// =============================================================================

/// Arbitrary JSON values, nested a few levels
fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        (-1.0e9f64..1.0e9).prop_map(|n| json!(n)),
        "[a-zA-Z0-9@:./\\- ]{0,40}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 64, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..8).prop_map(Value::Array),
            prop::collection::vec(("[a-z]{1,8}", inner), 0..8)
                .prop_map(|entries| Value::Object(entries.into_iter().collect())),
        ]
    })
}

fn email_like() -> impl Strategy<Value = String> {
    "[a-z]{1,10}(\\.[a-z]{1,10})?@[a-z]{1,10}\\.(com|org|net)"
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn inference_never_fails_on_shallow_documents(value in json_value()) {
        prop_assert!(SchemaInferrer::new().infer_json(&value).is_ok());
    }

    #[test]
    fn inference_is_deterministic(value in json_value()) {
        let inferrer = SchemaInferrer::new();
        prop_assert_eq!(inferrer.infer_json(&value), inferrer.infer_json(&value));
    }

    #[test]
    fn root_kind_follows_value(value in json_value()) {
        let schema = SchemaInferrer::new().infer_json(&value).unwrap();
        let expected = match &value {
            Value::Null => SchemaKind::Null,
            Value::Bool(_) => SchemaKind::Boolean,
            Value::Number(n) if n.is_f64() => SchemaKind::Number,
            Value::Number(_) => SchemaKind::Integer,
            Value::String(_) => SchemaKind::String,
            Value::Array(_) => SchemaKind::Array,
            Value::Object(_) => SchemaKind::Object,
        };
        prop_assert_eq!(schema.kind(), expected);
    }

    #[test]
    fn object_keeps_key_order(value in json_value()) {
        if let Value::Object(map) = &value {
            let schema = SchemaInferrer::new().infer_json(&value).unwrap();
            let keys: Vec<&String> = schema.properties().unwrap().keys().collect();
            let expected: Vec<&String> = map.keys().collect();
            prop_assert_eq!(keys, expected);
        }
    }

    #[test]
    fn i32_range_is_int32(n in any::<i32>()) {
        let schema = SchemaInferrer::new().infer_json(&json!(n)).unwrap();
        prop_assert_eq!(schema, SchemaNode::Integer { format: IntegerFormat::Int32 });
    }

    #[test]
    fn beyond_i32_is_int64(n in prop_oneof![i64::MIN..i64::from(i32::MIN), (i64::from(i32::MAX) + 1)..i64::MAX]) {
        let schema = SchemaInferrer::new().infer_json(&json!(n)).unwrap();
        prop_assert_eq!(schema, SchemaNode::Integer { format: IntegerFormat::Int64 });
    }

    #[test]
    fn emails_are_classified(email in email_like()) {
        prop_assert_eq!(classify(&email, SourceKind::JsonToken), Some(StringFormat::Email));
    }

    #[test]
    fn classify_never_panics(text in ".{0,200}") {
        let _ = classify(&text, SourceKind::Native);
    }
}

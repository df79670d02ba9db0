//! Behavior matrix for a single `even?` check.
//!
//! Every key declaration form (required/optional × block/value/filled/maybe)
//! is evaluated against the same six inputs: even, missing, nil, blank,
//! wrong type and odd. Each input either succeeds, fails with an exact
//! list of messages, or faults.

use sieve_schema::{optional, required, Fault, KeyRule, Schema, SchemaResult, Value};

fn schema(rule: KeyRule) -> Schema {
    Schema::builder()
        .key(rule)
        .build()
        .unwrap_or_else(|e| panic!("schema failed to build: {}", e))
}

fn call(schema: &Schema, input: serde_json::Value) -> Result<SchemaResult, Fault> {
    let input = Value::from_json(&input).unwrap();
    schema.call(&input)
}

fn assert_successful(schema: &Schema, input: serde_json::Value) {
    let result = call(schema, input.clone())
        .unwrap_or_else(|e| panic!("expected success for {}, got fault: {}", input, e));
    assert!(
        result.is_success(),
        "expected success for {}, got {:?}",
        input,
        result.error_messages()
    );
}

fn assert_failing(schema: &Schema, input: serde_json::Value, expected: &[&str]) {
    let result = call(schema, input.clone())
        .unwrap_or_else(|e| panic!("expected failure for {}, got fault: {}", input, e));
    assert!(result.is_failure(), "expected failure for {}", input);
    assert_eq!(result.error_messages(), expected, "messages for {}", input);
    assert!(result.errors().iter().all(|f| f.path.to_string() == "foo"));
}

fn assert_faults(schema: &Schema, input: serde_json::Value) {
    match call(schema, input.clone()) {
        Err(Fault::DomainMismatch { predicate, .. }) => assert_eq!(predicate, "even?"),
        Err(other) => panic!("expected domain mismatch for {}, got {}", input, other),
        Ok(result) => panic!(
            "expected fault for {}, got result {:?}",
            input,
            result.error_messages()
        ),
    }
}

fn even() -> serde_json::Value {
    serde_json::json!({ "foo": 2 })
}

fn missing() -> serde_json::Value {
    serde_json::json!({})
}

fn nil() -> serde_json::Value {
    serde_json::json!({ "foo": null })
}

fn blank() -> serde_json::Value {
    serde_json::json!({ "foo": "" })
}

fn wrong_type() -> serde_json::Value {
    serde_json::json!({ "foo": [] })
}

fn odd() -> serde_json::Value {
    serde_json::json!({ "foo": 1 })
}

/// Filled, but not an integer.
fn filled_wrong_type() -> Vec<serde_json::Value> {
    vec![
        serde_json::json!({ "foo": "abc" }),
        serde_json::json!({ "foo": { "a": 1 } }),
        serde_json::json!({ "foo": true }),
    ]
}

// ──────────────────────────────────────────────
// Plain blocks
// ──────────────────────────────────────────────

#[test]
fn required_block() {
    let s = schema(required("foo").block(["even?"]));
    assert_successful(&s, even());
    assert_failing(&s, missing(), &["is missing", "must be even"]);
    assert_faults(&s, nil());
    assert_faults(&s, blank());
    assert_faults(&s, wrong_type());
    assert_failing(&s, odd(), &["must be even"]);
}

#[test]
fn optional_block() {
    let s = schema(optional("foo").block(["even?"]));
    assert_successful(&s, even());
    assert_successful(&s, missing());
    assert_faults(&s, nil());
    assert_faults(&s, blank());
    assert_faults(&s, wrong_type());
    assert_failing(&s, odd(), &["must be even"]);
}

// ──────────────────────────────────────────────
// value
// ──────────────────────────────────────────────

#[test]
fn required_value() {
    let s = schema(required("foo").value(["even?"]));
    assert_successful(&s, even());
    assert_failing(&s, missing(), &["is missing", "must be even"]);
    assert_faults(&s, nil());
    assert_faults(&s, blank());
    assert_faults(&s, wrong_type());
    assert_failing(&s, odd(), &["must be even"]);
}

#[test]
fn optional_value() {
    let s = schema(optional("foo").value(["even?"]));
    assert_successful(&s, even());
    assert_successful(&s, missing());
    assert_faults(&s, nil());
    assert_faults(&s, blank());
    assert_faults(&s, wrong_type());
    assert_failing(&s, odd(), &["must be even"]);
}

// ──────────────────────────────────────────────
// filled
// ──────────────────────────────────────────────

#[test]
fn required_filled() {
    let s = schema(required("foo").filled(["even?"]));
    assert_successful(&s, even());
    assert_failing(&s, missing(), &["is missing", "must be even"]);
    assert_failing(&s, nil(), &["must be filled", "must be even"]);
    assert_failing(&s, blank(), &["must be filled", "must be even"]);
    assert_failing(&s, wrong_type(), &["must be filled", "must be even"]);
    for input in filled_wrong_type() {
        assert_failing(&s, input, &["must be even"]);
    }
    assert_failing(&s, odd(), &["must be even"]);
}

#[test]
fn optional_filled() {
    let s = schema(optional("foo").filled(["even?"]));
    assert_successful(&s, even());
    assert_successful(&s, missing());
    assert_failing(&s, nil(), &["must be filled", "must be even"]);
    assert_failing(&s, blank(), &["must be filled", "must be even"]);
    assert_failing(&s, wrong_type(), &["must be filled", "must be even"]);
    for input in filled_wrong_type() {
        assert_failing(&s, input, &["must be even"]);
    }
    assert_failing(&s, odd(), &["must be even"]);
}

// ──────────────────────────────────────────────
// maybe
// ──────────────────────────────────────────────

#[test]
fn required_maybe() {
    let s = schema(required("foo").maybe(["even?"]));
    assert_successful(&s, even());
    assert_failing(&s, missing(), &["is missing", "must be even"]);
    assert_successful(&s, nil());
    // maybe only lets nil through; blank text still reaches even?.
    assert_faults(&s, blank());
    assert_faults(&s, wrong_type());
    assert_failing(&s, odd(), &["must be even"]);
}

#[test]
fn optional_maybe() {
    let s = schema(optional("foo").maybe(["even?"]));
    assert_successful(&s, even());
    assert_successful(&s, missing());
    assert_successful(&s, nil());
    assert_faults(&s, blank());
    assert_faults(&s, wrong_type());
    assert_failing(&s, odd(), &["must be even"]);
}

// ──────────────────────────────────────────────
// Whole-result checks
// ──────────────────────────────────────────────

#[test]
fn missing_key_messages_as_json() {
    let s = schema(required("foo").value(["even?"]));
    let result = call(&s, missing()).unwrap();
    assert_eq!(
        result.to_json(),
        serde_json::json!({ "foo": ["is missing", "must be even"] })
    );
}

#[test]
fn integers_beyond_i64_are_checked_not_faulted() {
    let s = schema(required("foo").value(["even?"]));
    assert_successful(&s, serde_json::json!({ "foo": 18446744073709551614u64 }));
    assert_failing(
        &s,
        serde_json::json!({ "foo": 18446744073709551615u64 }),
        &["must be even"],
    );

    let s = schema(required("foo").filled(["odd?"]));
    assert_successful(&s, serde_json::json!({ "foo": 18446744073709551615u64 }));
    let result = call(&s, serde_json::json!({ "foo": 18446744073709551614u64 })).unwrap();
    assert_eq!(result.error_messages(), vec!["must be odd"]);
}

#[test]
fn successful_result_keeps_input() {
    let s = schema(required("foo").filled(["even?"]));
    let result = call(&s, even()).unwrap();
    assert_eq!(result.input().to_json(), even());
    assert!(result.errors().is_empty());
}

//! Serde integration and the list/object key rule.

use espalier::{Node, Raw};
use serde_json::json;

use crate::helpers::{books, raw};

#[test]
fn sequential_integer_keys_serialize_as_arrays() {
    let tree = books();
    let value = serde_json::to_value(&tree).unwrap();
    assert!(value.is_array());
    assert_eq!(value.as_array().unwrap().len(), 3);
}

#[test]
fn name_keys_serialize_as_objects_in_order() {
    let tree = Node::create(json!({"z": 1, "a": 2})).unwrap();
    let text = tree.to_json().unwrap();
    assert_eq!(text, r#"{"z":1,"a":2}"#);
}

#[test]
fn gapped_integer_keys_serialize_as_objects() {
    let tree = Node::create(json!([1, 0, 2])).unwrap().filter();
    // Keys 0 and 2 survive; the gap forces object form.
    assert_eq!(tree.to_json().unwrap(), r#"{"0":1,"2":2}"#);
}

#[test]
fn serialization_ignores_mode() {
    let plain = Node::create(json!({"bio": "<b>"})).unwrap();
    let escaped = plain.to_escaped();
    assert_eq!(plain.to_json().unwrap(), escaped.to_json().unwrap());
}

#[test]
fn raw_round_trips_as_json_text() {
    let source = raw(json!({"rows": [{"id": 1}], "total": 2}));
    let text = serde_json::to_string(&source).unwrap();
    let back: Raw = serde_json::from_str(&text).unwrap();
    assert_eq!(source, back);
}

#[test]
fn display_renders_the_materialized_shape() {
    let tree = Node::create(json!({"a": [1, 2]})).unwrap();
    assert_eq!(tree.to_string(), r#"{"a":[1,2]}"#);
}

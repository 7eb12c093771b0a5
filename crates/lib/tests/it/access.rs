//! Lookup, positional access, listing, and materialization.

use espalier::{Key, Node, QueryStats, Raw};
use serde_json::json;

use crate::helpers::{books, numbers, profile, raw};

#[test]
fn get_field_and_at_share_one_lookup() {
    let tree = profile();
    assert_eq!(tree.get("name").raw(), Raw::Text("Ada".into()));
    assert_eq!(tree.field("name").raw(), Raw::Text("Ada".into()));

    let tags = numbers();
    assert_eq!(tags.at(1).raw(), Raw::Int(1));
    assert_eq!(tags.get(1).raw(), Raw::Int(1));
}

#[test]
fn positional_access_ignores_keys() {
    let tree = profile();
    assert_eq!(tree.first().raw(), Raw::Text("Ada".into()));
    assert_eq!(tree.last().len(), 2); // the tags node
    assert_eq!(tree.nth(1).raw(), Raw::Text("<b>pioneer</b>".into()));
}

#[test]
fn nth_accepts_negative_indices() {
    let tree = numbers();
    assert_eq!(tree.nth(-1).raw(), Raw::Int(2));
    assert_eq!(tree.nth(-3).raw(), Raw::Int(3));
    assert!(tree.nth(-4).is_absent());
    assert!(tree.nth(3).is_absent());
}

#[test]
fn nth_on_empty_returns_sentinel() {
    let empty = Node::create(json!([])).unwrap();
    assert!(empty.nth(-1).is_absent());
    assert!(empty.first().is_absent());
    assert!(empty.last().is_absent());
}

#[test]
fn counting_is_cheap_and_consistent() {
    let tree = books();
    assert_eq!(tree.len(), 3);
    assert_eq!(tree.count(), 3);
    assert!(tree.is_not_empty());
    assert!(!tree.is_empty());
}

#[test]
fn contains_uses_loose_equality() {
    let tree = Node::create(json!(["1", "x", 3])).unwrap();
    assert!(tree.contains(1));
    assert!(tree.contains("x"));
    assert!(tree.contains("3"));
    assert!(!tree.contains(2));
}

#[test]
fn contains_matches_nested_values_structurally() {
    let tree = Node::create(json!([{"a": 1}, {"b": 2}])).unwrap();
    assert!(tree.contains(raw(json!({"a": 1}))));
    assert!(!tree.contains(raw(json!({"a": 2}))));
}

#[test]
fn keys_and_values_reset_top_level_listing() {
    let tree = profile();
    let keys = tree.keys();
    assert_eq!(
        keys.materialize(),
        raw(json!(["name", "bio", "tags"]))
    );
    // Re-indexed with fresh position metadata.
    assert!(keys.first().position().unwrap().is_first);

    let values = tree.values();
    assert_eq!(values.len(), 3);
    assert_eq!(values.first().raw(), Raw::Text("Ada".into()));
    let pos = values.last().position().unwrap();
    assert_eq!(pos.ordinal, 3);
    assert!(pos.is_last);
}

#[test]
fn iteration_preserves_insertion_order() {
    let tree = profile();
    let keys: Vec<Key> = tree.iter().map(|(key, _)| key).collect();
    assert_eq!(
        keys,
        vec![Key::from("name"), Key::from("bio"), Key::from("tags")]
    );
}

#[test]
fn get_or_substitutes_defaults() {
    let tree = profile();
    assert_eq!(tree.get_or("name", "fallback").raw(), Raw::Text("Ada".into()));
    assert_eq!(tree.get_or("missing", "fallback").raw(), Raw::Text("fallback".into()));
    let nested = tree.get_or("missing", raw(json!([1, 2, 3])));
    assert_eq!(nested.len(), 3);
}

#[test]
fn extensions_reachable_from_descendants_via_root() {
    let tree = Node::builder()
        .extension(QueryStats {
            num_rows: 3,
            last_insert_id: Some(99),
            error: None,
        })
        .build(json!([{"id": 1, "child": {"deep": true}}]))
        .unwrap();

    let row = tree.first();
    let row = row.as_node().unwrap();
    let child = row.get("child");
    let child = child.as_node().unwrap();
    let root = child.root();
    let stats = root.extensions().get::<QueryStats>().unwrap();
    assert_eq!(stats.num_rows, 3);
    assert_eq!(stats.last_insert_id, Some(99));
}

#[test]
fn paths_name_nodes_from_the_root() {
    let tree = Node::create(json!({"users": [{"name": "Ada"}]})).unwrap();
    assert_eq!(tree.path(), "$");
    let users = tree.get("users");
    assert_eq!(users.as_node().unwrap().path(), "$.users");
    let first = users.first();
    assert_eq!(first.as_node().unwrap().path(), "$.users.0");
}

#[test]
fn materialize_is_always_raw() {
    let tree = Node::create_escaped(json!({"bio": "<b>x</b>"})).unwrap();
    assert_eq!(tree.materialize(), raw(json!({"bio": "<b>x</b>"})));
}

#[test]
fn deprecated_to_array_still_materializes() {
    let tree = numbers();
    #[allow(deprecated)]
    let data = tree.to_array();
    assert_eq!(data, raw(json!([3, 1, 2])));
}

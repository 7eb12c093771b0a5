//! filter / where / unique / sort.

use espalier::{Key, Node, Raw};
use serde_json::json;

use crate::helpers::{books, raw};

#[test]
fn filter_drops_falsy_values() {
    let tree = Node::create(json!(["keep", "", 0, null, false, [], [1], "0"])).unwrap();
    let kept = tree.filter();
    // "0" is non-empty text and stays; zero, null, false, empties drop.
    // Original keys survive, so the gaps make this a map.
    assert_eq!(
        kept.materialize(),
        raw(json!({"0": "keep", "6": [1], "7": "0"}))
    );
}

#[test]
fn filter_preserves_original_keys() {
    let tree = Node::create(json!({"a": 1, "b": 0, "c": 2})).unwrap();
    let kept = tree.filter();
    assert_eq!(kept.materialize(), raw(json!({"a": 1, "c": 2})));
    assert!(kept.contains_key("c"));
    assert!(!kept.contains_key("b"));
}

#[test]
fn filter_with_receives_raw_values() {
    let tree = Node::create(json!([1, 2, 3, 4])).unwrap();
    let even = tree.filter_with(|value| {
        value
            .as_scalar()
            .and_then(|s| s.as_int())
            .map(|n| n % 2 == 0)
            .unwrap_or(false)
    });
    assert_eq!(even.materialize(), raw(json!({"1": 2, "3": 4})));
}

#[test]
fn filter_recomputes_positions() {
    let tree = Node::create(json!([0, "a", 0, "b"])).unwrap();
    let kept = tree.filter();
    let last = kept.last();
    let pos = last.position().unwrap();
    assert_eq!(pos.ordinal, 2);
    assert!(pos.is_last);
}

#[test]
fn where_eq_is_numeric_string_tolerant() {
    let rows = Node::create(json!([
        {"status": "1", "name": "a"},
        {"status": 0, "name": "b"},
        {"status": 1, "name": "c"},
    ]))
    .unwrap();
    let active = rows.where_eq("status", 1);
    assert_eq!(active.len(), 2);
    assert_eq!(active.pluck("name").implode(",").unwrap(), "a,c");
}

#[test]
fn where_all_requires_every_condition() {
    let matched = books().where_all([("genre", Raw::from("SciFi")), ("id", Raw::from(30))]);
    assert_eq!(matched.len(), 1);
    assert_eq!(matched.first().get("title").render(), "Dune");
}

#[test]
fn where_drops_scalar_elements_and_missing_fields() {
    let mixed = Node::create(json!([{"k": 1}, "scalar", {"other": 1}])).unwrap();
    assert_eq!(mixed.where_eq("k", 1).len(), 1);
}

#[test]
fn where_preserves_original_keys() {
    let rows = books().where_eq("genre", "SciFi");
    let keys: Vec<Key> = rows.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec![Key::Index(0), Key::Index(2)]);
}

#[test]
fn unique_keeps_first_occurrence_and_keys() {
    let tree = Node::create(json!(["a", "b", "a", 1, "1", 2])).unwrap();
    let deduped = tree.unique().unwrap();
    // Loose equality: "1" duplicates 1.
    assert_eq!(
        deduped.materialize(),
        raw(json!({"0": "a", "1": "b", "3": 1, "5": 2}))
    );
}

#[test]
fn unique_rejects_nested_collections() {
    let err = books().unique().unwrap_err();
    assert!(err.is_invalid_argument());
}

#[test]
fn sort_is_numeric_for_numeric_looking_values() {
    let tree = Node::create(json!(["10", 2, "1"])).unwrap();
    let sorted = tree.sort().unwrap();
    assert_eq!(sorted.materialize(), raw(json!(["1", 2, "10"])));
}

#[test]
fn sort_is_lexical_otherwise() {
    let tree = Node::create(json!(["pear", "apple", "plum"])).unwrap();
    let sorted = tree.sort().unwrap();
    assert_eq!(sorted.materialize(), raw(json!(["apple", "pear", "plum"])));
}

#[test]
fn sort_rejects_nested_collections() {
    let err = books().sort().unwrap_err();
    assert!(err.is_invalid_argument());
}

#[test]
fn sort_by_orders_rows_and_stays_stable() {
    let rows = Node::create(json!([
        {"rank": 2, "name": "b1"},
        {"rank": 1, "name": "a"},
        {"rank": 2, "name": "b2"},
    ]))
    .unwrap();
    let sorted = rows.sort_by("rank").unwrap();
    assert_eq!(sorted.pluck("name").implode(",").unwrap(), "a,b1,b2");
}

#[test]
fn sort_by_rejects_scalar_elements() {
    let mixed = Node::create(json!([{"rank": 1}, 5])).unwrap();
    let err = mixed.sort_by("rank").unwrap_err();
    assert!(err.is_invalid_argument());
}

//! chunk / merge / map / each / reverse.

use espalier::{Item, Node, Raw};
use serde_json::json;

use crate::helpers::{books, numbers, raw};

#[test]
fn chunk_splits_preserving_order() {
    let chunked = numbers().chunk(2).unwrap();
    assert_eq!(chunked.materialize(), raw(json!([[3, 1], [2]])));
    assert_eq!(chunked.first().len(), 2);
    assert_eq!(chunked.last().len(), 1);
}

#[test]
fn chunk_rejects_zero_size() {
    let err = numbers().chunk(0).unwrap_err();
    assert!(err.is_invalid_argument());
}

#[test]
fn merge_renumbers_integer_keys_sequentially() {
    let left = Node::create(json!(["a", "b"])).unwrap();
    let right = Node::create(json!(["c"])).unwrap();
    let merged = left.merge([right]);
    assert_eq!(merged.materialize(), raw(json!(["a", "b", "c"])));
}

#[test]
fn merge_overwrites_name_keys_with_later_inputs() {
    let left = Node::create(json!({"x": "a", "keep": 1})).unwrap();
    let right = Node::create(json!({"x": "b"})).unwrap();
    let merged = left.merge([right]);
    assert_eq!(merged.materialize(), raw(json!({"x": "b", "keep": 1})));
}

#[test]
fn merge_accepts_multiple_inputs_in_order() {
    let a = Node::create(json!(["a"])).unwrap();
    let b = Node::create(json!(["b"])).unwrap();
    let c = Node::create(json!(["c"])).unwrap();
    let merged = a.merge([b, c]);
    assert_eq!(merged.materialize(), raw(json!(["a", "b", "c"])));
}

#[test]
fn map_transforms_raw_values() {
    let doubled = numbers()
        .map(|value| match value {
            Raw::Int(n) => Raw::Int(n * 2),
            other => other,
        })
        .unwrap();
    assert_eq!(doubled.materialize(), raw(json!([6, 2, 4])));
}

#[test]
fn map_passes_rows_as_materialized_data_and_rewraps_output() {
    let renamed = books()
        .map(|value| match value {
            Raw::Map(mut row) => {
                let title = row.shift_remove("title").unwrap_or(Raw::Null);
                Raw::map([("label", title)])
            }
            other => other,
        })
        .unwrap();
    // Output rows came back as plain maps and were re-wrapped into nodes.
    let first = renamed.first();
    assert!(matches!(first, Item::Node(_)));
    assert_eq!(renamed.pluck("label").implode("|").unwrap(), "Solaris|Middlemarch|Dune");
}

#[test]
fn smart_map_receives_the_mode_aware_handle() {
    let tree = Node::create_escaped(json!(["<i>", "ok"])).unwrap();
    let rendered = tree
        .smart_map(|item| Raw::Text(item.render()))
        .unwrap();
    assert_eq!(
        rendered.materialize(),
        raw(json!(["&lt;i&gt;", "ok"]))
    );
}

#[test]
fn each_is_side_effect_only() {
    let tree = numbers();
    let mut seen = Vec::new();
    let same = tree.each(|key, item| {
        seen.push(format!("{key}={}", item.render()));
    });
    assert!(same.ptr_eq(&tree));
    assert_eq!(seen, ["0=3", "1=1", "2=2"]);
}

#[test]
fn reverse_reindexes_in_opposite_order() {
    let reversed = numbers().reverse();
    assert_eq!(reversed.materialize(), raw(json!([2, 1, 3])));
    assert!(reversed.first().position().unwrap().is_first);
}

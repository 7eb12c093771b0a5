//! index_by / group_by / pluck.
//!
//! Skipped-row diagnostics go to the warning channel; the channel itself
//! is exercised in the diag module, which is the only place that touches
//! the process-wide toggles.

use espalier::Node;
use serde_json::json;

use crate::helpers::{books, raw};

#[test]
fn index_by_keeps_the_last_row_per_key() {
    let indexed = books().index_by("genre");
    assert_eq!(indexed.len(), 2);
    // Dune overwrote Solaris under "SciFi".
    assert_eq!(indexed.get("SciFi").get("title").render(), "Dune");
    assert_eq!(indexed.get("Lit").get("title").render(), "Middlemarch");
}

#[test]
fn group_by_collects_all_rows_in_original_order() {
    let grouped = books().group_by("genre");
    assert_eq!(grouped.len(), 2);

    // Groups appear in order of first key appearance.
    let group_keys: Vec<String> = grouped.iter().map(|(k, _)| k.to_string()).collect();
    assert_eq!(group_keys, ["SciFi", "Lit"]);

    let scifi = grouped.get("SciFi");
    assert_eq!(scifi.len(), 2);
    assert_eq!(
        scifi.as_node().unwrap().pluck("title").implode(",").unwrap(),
        "Solaris,Dune"
    );
}

#[test]
fn group_members_get_positions_within_their_group() {
    let grouped = books().group_by("genre");
    let scifi = grouped.get("SciFi");
    let last = scifi.last();
    let pos = last.position().unwrap();
    assert_eq!(pos.ordinal, 2);
    assert!(pos.is_last);
}

#[test]
fn rows_missing_the_key_column_are_skipped() {
    let rows = Node::create(json!([
        {"genre": "SciFi", "id": 1},
        {"id": 2},
        "not a row",
    ]))
    .unwrap();
    assert_eq!(rows.index_by("genre").len(), 1);
    assert_eq!(rows.group_by("genre").len(), 1);
}

#[test]
fn pluck_extracts_one_field_per_row() {
    let ids = books().pluck("id");
    assert_eq!(ids.materialize(), raw(json!([10, 20, 30])));
}

#[test]
fn pluck_skips_rows_without_the_field() {
    let rows = Node::create(json!([{"id": 1}, {"other": 2}, {"id": 3}])).unwrap();
    assert_eq!(rows.pluck("id").materialize(), raw(json!([1, 3])));
}

#[test]
fn pluck_nth_extracts_by_field_position() {
    let firsts = books().pluck_nth(0);
    assert_eq!(firsts.materialize(), raw(json!([10, 20, 30])));

    let ragged = Node::create(json!([{"a": 1, "b": 2}, {"only": 9}])).unwrap();
    assert_eq!(ragged.pluck_nth(1).materialize(), raw(json!([2])));
}

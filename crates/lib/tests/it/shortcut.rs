//! Blank-value shortcut operations and responders.

use std::sync::{Arc, Mutex};

use espalier::{Node, Respond};
use serde_json::json;

/// Records responder notifications for assertions.
#[derive(Default, Clone)]
struct Recording(Arc<Mutex<Vec<String>>>);

impl Respond for Recording {
    fn die(&self, message: &str) {
        self.0.lock().unwrap().push(format!("die:{message}"));
    }

    fn not_found(&self, message: &str) {
        self.0.lock().unwrap().push(format!("404:{message}"));
    }

    fn redirect(&self, url: &str) {
        self.0.lock().unwrap().push(format!("redirect:{url}"));
    }
}

fn with_recorder(input: serde_json::Value) -> (Node, Recording) {
    let recorder = Recording::default();
    let node = Node::builder()
        .responder(recorder.clone())
        .build(input)
        .unwrap();
    (node, recorder)
}

#[test]
fn non_blank_values_pass_through_unchanged() {
    let tree = crate::helpers::books();
    let same = tree.clone().or_404("no rows").unwrap();
    assert!(same.ptr_eq(&tree));

    let item = tree.first().or_throw("missing row").unwrap();
    assert!(!item.is_absent());
}

#[test]
fn or_404_trips_on_empty_collections() {
    let (empty, recorder) = with_recorder(json!([]));
    let err = empty.or_404("no rows").unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(recorder.0.lock().unwrap().as_slice(), ["404:no rows"]);
}

#[test]
fn or_die_trips_on_blank_leaves() {
    let (tree, recorder) = with_recorder(json!({"name": ""}));
    let err = tree.get("name").or_die("empty name").unwrap_err();
    assert!(err.is_shortcut());
    assert_eq!(recorder.0.lock().unwrap().as_slice(), ["die:empty name"]);
}

#[test]
fn or_redirect_trips_on_absent_data() {
    let (tree, recorder) = with_recorder(json!({"name": "x"}));
    let err = tree.get("missing").or_redirect("/login").unwrap_err();
    assert!(err.is_redirect());
    assert_eq!(
        recorder.0.lock().unwrap().as_slice(),
        ["redirect:/login"]
    );
}

#[test]
fn or_throw_raises_without_a_responder() {
    let (tree, recorder) = with_recorder(json!({"flag": false}));
    let err = tree.get("flag").or_throw("flag required").unwrap_err();
    assert_eq!(err.to_string(), "flag required");
    // or_throw is the one shortcut that notifies nobody.
    assert!(recorder.0.lock().unwrap().is_empty());
}

#[test]
fn zero_is_falsy_but_not_blank() {
    let tree = Node::create(json!({"count": 0})).unwrap();
    assert!(tree.get("count").or_404("gone").is_ok());
}

#[test]
fn null_false_and_empty_string_are_blank() {
    let tree = Node::create(json!({"a": null, "b": false, "c": "", "d": "x"})).unwrap();
    assert!(tree.get("a").or_throw("a").is_err());
    assert!(tree.get("b").or_throw("b").is_err());
    assert!(tree.get("c").or_throw("c").is_err());
    assert!(tree.get("d").or_throw("d").is_ok());
}

#[test]
fn shortcuts_chain_with_question_mark() {
    fn render(tree: &Node) -> espalier::Result<String> {
        tree.get("rows")
            .or_404("rows missing")?
            .as_node()
            .cloned()
            .unwrap_or(Node::create(json!([]))?)
            .pluck("id")
            .implode(",")
    }

    let full = Node::create(json!({"rows": [{"id": 1}, {"id": 2}]})).unwrap();
    assert_eq!(render(&full).unwrap(), "1,2");

    let empty = Node::create(json!({})).unwrap();
    assert!(render(&empty).unwrap_err().is_not_found());
}

//! Lazy switching between raw and escaped presentation.
//!
//! Conversion is only triggered on explicit request; reads in the current
//! mode never walk the tree. When the tree is already in the target mode
//! the identical allocation comes back (observable via
//! [`Node::ptr_eq`]), which makes conversion idempotent and cheap once
//! converged.

use indexmap::IndexMap;

use super::{Mode, Node, Value};

impl Node {
    /// This tree in escaped mode.
    pub fn to_escaped(&self) -> Node {
        self.convert(Mode::Escaped)
    }

    /// This tree in raw mode.
    pub fn to_raw(&self) -> Node {
        self.convert(Mode::Raw)
    }

    fn convert(&self, target: Mode) -> Node {
        if self.0.mode == target {
            return self.clone();
        }
        let converted = self.convert_tree(target);
        converted.link_tree();
        converted
    }

    /// Rebuilds the whole tree in `target` mode. Structure and position
    /// metadata carry over; back-links in the result point at the new
    /// ancestors, never into the source tree.
    fn convert_tree(&self, target: Mode) -> Node {
        let entries: IndexMap<_, _> = self
            .0
            .entries
            .iter()
            .map(|(key, value)| {
                let value = match value {
                    Value::Node(child) => Value::Node(child.convert_tree(target)),
                    Value::Scalar(scalar) => Value::Scalar(scalar.clone()),
                };
                (key.clone(), value)
            })
            .collect();
        Node::from_parts(entries, target, self.0.pos, self.0.context.clone())
    }
}

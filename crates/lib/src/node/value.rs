//! Stored values: the leaf/branch variant held in a node's entries.

use crate::raw::Raw;
use crate::scalar::Scalar;

use super::Node;

/// A value stored in a node's entries.
///
/// Either a terminal [`Scalar`] or a nested [`Node`]. The absent sentinel
/// is never stored — it exists only on the read surface
/// ([`Item`](super::Item)).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Terminal leaf value.
    Scalar(Scalar),
    /// Nested collection.
    Node(Node),
}

impl Value {
    /// Returns true for leaf values.
    pub fn is_scalar(&self) -> bool {
        matches!(self, Value::Scalar(_))
    }

    /// Returns true for nested collections.
    pub fn is_node(&self) -> bool {
        matches!(self, Value::Node(_))
    }

    /// Borrows the scalar, if this is a leaf.
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Value::Scalar(scalar) => Some(scalar),
            Value::Node(_) => None,
        }
    }

    /// Borrows the nested node, if this is one.
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Value::Scalar(_) => None,
            Value::Node(node) => Some(node),
        }
    }

    /// Recursively unwraps to plain raw data.
    pub fn materialize(&self) -> Raw {
        match self {
            Value::Scalar(scalar) => Raw::from(scalar.clone()),
            Value::Node(node) => node.materialize(),
        }
    }

    /// Truthiness used by the no-predicate `filter`: falsy scalars and
    /// empty collections drop.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Scalar(scalar) => scalar.is_truthy(),
            Value::Node(node) => node.is_not_empty(),
        }
    }

    /// Blankness used by the shortcut operations.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Scalar(scalar) => scalar.is_blank(),
            Value::Node(node) => node.is_empty(),
        }
    }

    /// Loose equality against plain data: scalars use the numeric-string
    /// tolerant semantics, nested nodes compare structurally.
    pub fn loose_eq(&self, other: &Raw) -> bool {
        match (self, other.as_scalar()) {
            (Value::Scalar(scalar), Some(other_scalar)) => scalar.loose_eq(&other_scalar),
            (Value::Node(node), None) => node.materialize() == *other,
            _ => false,
        }
    }
}

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        Value::Scalar(scalar)
    }
}

impl From<Node> for Value {
    fn from(node: Node) -> Self {
        Value::Node(node)
    }
}

//! Recursive construction of node trees from plain data.
//!
//! Normalization is a single top-to-bottom pass: lists become
//! integer-keyed nodes, maps become name-keyed nodes, nested collections
//! become child nodes with position metadata assigned from their index
//! among siblings. A second pass wires the parent/root back-links once the
//! root allocation exists. Re-normalizing a node's materialized form
//! yields an equivalent node.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::key::Key;
use crate::raw::Raw;
use crate::scalar::Scalar;
use crate::Result;

use super::{Context, Mode, Node, NodeError, Position, Value};

/// Construction depth cap. Trees deeper than this are rejected as invalid
/// input rather than risking the stack.
pub(crate) const MAX_DEPTH: usize = 128;

/// Builds and links a tree from plain data.
pub(crate) fn normalize(input: Raw, mode: Mode, context: Arc<Context>) -> Result<Node> {
    let node = build_unlinked(input, mode, &context)?;
    node.link_tree();
    Ok(node)
}

/// Builds a tree without wiring back-links. Callers that splice the result
/// under an existing node link it themselves; everyone else goes through
/// [`normalize`].
pub(crate) fn build_unlinked(input: Raw, mode: Mode, context: &Arc<Context>) -> Result<Node> {
    build(input, mode, context, None, 0)
}

/// Converts a non-collection raw value to a scalar, rejecting floats that
/// cannot be ordered or serialized.
pub(crate) fn finite_scalar(input: Raw) -> Result<Scalar> {
    match input.as_scalar() {
        Some(Scalar::Float(x)) if !x.is_finite() => {
            Err(NodeError::NonFiniteNumber { value: x }.into())
        }
        Some(scalar) => Ok(scalar),
        None => Ok(Scalar::Null),
    }
}

fn build(
    input: Raw,
    mode: Mode,
    context: &Arc<Context>,
    pos: Option<Position>,
    depth: usize,
) -> Result<Node> {
    if depth > MAX_DEPTH {
        return Err(NodeError::DepthExceeded { limit: MAX_DEPTH }.into());
    }
    let mut entries = IndexMap::new();
    match input {
        Raw::List(items) => {
            let len = items.len();
            for (index, item) in items.into_iter().enumerate() {
                let value = build_value(item, mode, context, Position::of(index, len), depth)?;
                entries.insert(Key::Index(index), value);
            }
        }
        Raw::Map(map) => {
            let len = map.len();
            for (index, (name, item)) in map.into_iter().enumerate() {
                let value = build_value(item, mode, context, Position::of(index, len), depth)?;
                entries.insert(Key::Name(name), value);
            }
        }
        // A lone scalar wraps as a single-element listing.
        scalar => {
            entries.insert(Key::Index(0), Value::Scalar(finite_scalar(scalar)?));
        }
    }
    Ok(Node::from_parts(entries, mode, pos, context.clone()))
}

fn build_value(
    input: Raw,
    mode: Mode,
    context: &Arc<Context>,
    pos: Position,
    depth: usize,
) -> Result<Value> {
    if input.is_collection() {
        let child = build(input, mode, context, Some(pos), depth + 1)?;
        Ok(Value::Node(child))
    } else {
        Ok(Value::Scalar(finite_scalar(input)?))
    }
}

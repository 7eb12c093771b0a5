//! The chainable read surface: nodes, leaves, and the absent sentinel.
//!
//! Every lookup on a node yields an [`Item`]. The three variants share one
//! navigable surface, so a chain like
//! `tree.get("a").get("b").first().raw()` works uniformly whether the data
//! is present, a scalar, or missing entirely — absence degrades to
//! [`Absent`] and terminal reads yield null, never a panic.

use std::fmt;
use std::sync::Arc;

use crate::diag;
use crate::escape::Safe;
use crate::key::Key;
use crate::raw::Raw;
use crate::scalar::Scalar;

use super::{Context, Mode, Node, Position};

/// A scalar read handle carrying the mode it was read under.
///
/// A leaf renders raw or escaped depending on the mode of the node it was
/// read from; the underlying scalar is always stored raw.
#[derive(Clone)]
pub struct Leaf {
    scalar: Scalar,
    mode: Mode,
    context: Arc<Context>,
    position: Option<Position>,
    origin: Node,
    key: Key,
}

impl Leaf {
    pub(crate) fn new(
        scalar: Scalar,
        mode: Mode,
        context: Arc<Context>,
        position: Option<Position>,
        origin: Node,
        key: Key,
    ) -> Self {
        Self {
            scalar,
            mode,
            context,
            position,
            origin,
            key,
        }
    }

    /// The raw scalar, regardless of mode.
    pub fn scalar(&self) -> &Scalar {
        &self.scalar
    }

    /// The mode this leaf was read under.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The key this leaf was read through.
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// Position among siblings at read time; `None` for detached reads
    /// (defaults, loader results).
    pub fn position(&self) -> Option<Position> {
        self.position
    }

    /// Mode-aware text: raw rendering in raw mode, escaped in escaped
    /// mode.
    pub fn render(&self) -> String {
        match self.mode {
            Mode::Raw => self.scalar.to_string(),
            Mode::Escaped => self.context.escaper.escape(&self.scalar).into_inner(),
        }
    }

    /// Escapes through the tree's wrapper regardless of mode.
    pub fn escaped(&self) -> Safe {
        self.context.escaper.escape(&self.scalar)
    }

    pub(crate) fn context(&self) -> &Arc<Context> {
        &self.context
    }

    fn path(&self) -> String {
        format!("{}.{}", self.origin.path(), self.key)
    }
}

impl fmt::Debug for Leaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Leaf")
            .field("scalar", &self.scalar)
            .field("mode", &self.mode)
            .field("position", &self.position)
            .finish()
    }
}

/// Chain-safe stand-in returned for absent keys and positions.
///
/// Carries the queried key and the path of the node it was queried on, so
/// a missing-key diagnostic can name its origin without help from the call
/// site. Every navigation on an `Absent` yields `Absent` again.
#[derive(Clone)]
pub struct Absent {
    key: Key,
    path: String,
    context: Arc<Context>,
}

impl Absent {
    pub(crate) fn new(key: Key, path: String, context: Arc<Context>) -> Self {
        Self { key, path, context }
    }

    /// The key whose lookup produced this sentinel.
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// Path of the node the lookup ran against.
    pub fn origin(&self) -> &str {
        &self.path
    }

    pub(crate) fn context(&self) -> &Arc<Context> {
        &self.context
    }

    fn extend(&self, key: Key) -> Absent {
        Absent {
            path: format!("{}.{}", self.path, self.key),
            key,
            context: self.context.clone(),
        }
    }
}

impl fmt::Debug for Absent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Absent")
            .field("key", &self.key)
            .field("origin", &self.path)
            .finish()
    }
}

/// The unified read surface over present and absent data.
#[derive(Debug, Clone)]
pub enum Item {
    /// A nested collection.
    Node(Node),
    /// A terminal scalar with its read context.
    Leaf(Leaf),
    /// The chain-safe absent sentinel.
    Absent(Absent),
}

impl Item {
    /// Navigates by key. Collections delegate to [`Node::get`]; leaves and
    /// sentinels degrade to [`Absent`].
    pub fn get(&self, key: impl Into<Key>) -> Item {
        let key = key.into();
        match self {
            Item::Node(node) => node.get(key),
            Item::Leaf(leaf) => {
                let path = leaf.path();
                diag::missing_key(&key, &path);
                Item::Absent(Absent::new(key, path, leaf.context.clone()))
            }
            // No diagnostic: the head of the chain already reported.
            Item::Absent(absent) => Item::Absent(absent.extend(key)),
        }
    }

    /// First element; `Absent` for leaves and sentinels.
    pub fn first(&self) -> Item {
        self.nth(0)
    }

    /// Last element; `Absent` for leaves and sentinels.
    pub fn last(&self) -> Item {
        self.nth(-1)
    }

    /// Positional navigation with the semantics of [`Node::nth`].
    pub fn nth(&self, index: i64) -> Item {
        match self {
            Item::Node(node) => node.nth(index),
            Item::Leaf(leaf) => Item::Absent(Absent::new(
                Key::Name(index.to_string()),
                leaf.path(),
                leaf.context.clone(),
            )),
            Item::Absent(absent) => Item::Absent(absent.extend(Key::Name(index.to_string()))),
        }
    }

    /// Entry count; 0 for leaves and sentinels.
    pub fn len(&self) -> usize {
        match self {
            Item::Node(node) => node.len(),
            _ => 0,
        }
    }

    /// Returns true when there is nothing to iterate.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates entries; empty for leaves and sentinels.
    pub fn iter(&self) -> std::vec::IntoIter<(Key, Item)> {
        match self {
            Item::Node(node) => node.iter().collect::<Vec<_>>().into_iter(),
            _ => Vec::new().into_iter(),
        }
    }

    /// Returns true for the absent sentinel.
    pub fn is_absent(&self) -> bool {
        matches!(self, Item::Absent(_))
    }

    /// Returns true for nested collections.
    pub fn is_node(&self) -> bool {
        matches!(self, Item::Node(_))
    }

    /// Returns true for terminal scalars.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Item::Leaf(_))
    }

    /// Blankness for the shortcut operations: absent, null, `false`, empty
    /// string, or empty collection.
    pub fn is_blank(&self) -> bool {
        match self {
            Item::Node(node) => node.is_empty(),
            Item::Leaf(leaf) => leaf.scalar.is_blank(),
            Item::Absent(_) => true,
        }
    }

    /// Borrows the node, if this is a collection.
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Item::Node(node) => Some(node),
            _ => None,
        }
    }

    /// Borrows the scalar, if this is a leaf.
    pub fn scalar(&self) -> Option<&Scalar> {
        match self {
            Item::Leaf(leaf) => Some(&leaf.scalar),
            _ => None,
        }
    }

    /// Terminal read: plain raw data. Sentinels yield null.
    pub fn raw(&self) -> Raw {
        match self {
            Item::Node(node) => node.materialize(),
            Item::Leaf(leaf) => Raw::from(leaf.scalar.clone()),
            Item::Absent(_) => Raw::Null,
        }
    }

    /// Mode-aware text. Leaves render through their mode, collections
    /// render their materialized JSON-like shape, sentinels render empty.
    pub fn render(&self) -> String {
        match self {
            Item::Node(node) => node.to_string(),
            Item::Leaf(leaf) => leaf.render(),
            Item::Absent(_) => String::new(),
        }
    }

    /// Position among siblings at read time, where known.
    pub fn position(&self) -> Option<Position> {
        match self {
            Item::Node(node) => node.position(),
            Item::Leaf(leaf) => leaf.position,
            Item::Absent(_) => None,
        }
    }

    pub(crate) fn context(&self) -> Arc<Context> {
        match self {
            Item::Node(node) => node.context_arc(),
            Item::Leaf(leaf) => leaf.context().clone(),
            Item::Absent(absent) => absent.context().clone(),
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

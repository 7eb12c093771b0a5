//! The immutable collection node.
//!
//! [`Node`] is the core wrapper type: an insertion-ordered mapping of
//! [`Key`] to [`Value`] with a presentation [`Mode`], positional metadata,
//! and non-owning parent/root back-links. Nodes are immutable after
//! construction — every transformation returns a fresh node, so captured
//! references and concurrent readers need no synchronization.
//!
//! # Construction
//!
//! ```
//! use espalier::{Mode, Node};
//! use serde_json::json;
//!
//! let tree = Node::create(json!({"name": "Ada", "tags": ["math", "dev"]}))?;
//! assert_eq!(tree.len(), 2);
//! assert_eq!(tree.get("tags").get(0).render(), "math");
//! assert_eq!(tree.mode(), Mode::Raw);
//! # Ok::<(), espalier::Error>(())
//! ```
//!
//! # Identity and sharing
//!
//! A `Node` is a cheap handle (one `Arc`); cloning shares the allocation.
//! Transformations rebuild their output's immediate children with fresh
//! position metadata and re-anchored back-links; grandchildren are shared
//! by reference and keep the metadata of the tree they were built in.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock, Weak};

use indexmap::IndexMap;
use serde::ser::{Serialize, Serializer};

use crate::diag;
use crate::escape::{Escape, HtmlEscaper};
use crate::extensions::Extensions;
use crate::key::Key;
use crate::loader::{LoadRelated, Loader};
use crate::raw::Raw;
use crate::Result;

mod convert;
mod errors;
mod item;
mod normalize;
mod ops;
mod position;
mod shortcut;
mod value;

pub use errors::NodeError;
pub use item::{Absent, Item, Leaf};
pub use position::Position;
pub use shortcut::{NoRespond, Respond, Shortcut};
pub use value::Value;

/// Whether leaf scalars are surfaced raw or through the escaping wrapper.
///
/// Storage is always raw; the mode is a view flag consulted at read time,
/// so reads in the current mode are zero-cost and conversion never
/// duplicates scalar storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Leaves read as plain scalars.
    Raw,
    /// Leaves read through the tree's escaper.
    Escaped,
}

impl Mode {
    /// Returns true for [`Mode::Escaped`].
    pub fn is_escaped(self) -> bool {
        matches!(self, Mode::Escaped)
    }
}

/// Collaborators shared by every node of a tree and by derived trees.
pub(crate) struct Context {
    pub(crate) escaper: Arc<dyn Escape>,
    pub(crate) responder: Arc<dyn Respond>,
    pub(crate) extensions: Extensions,
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("extensions", &self.extensions)
            .finish()
    }
}

pub(crate) struct Inner {
    entries: IndexMap<Key, Value>,
    mode: Mode,
    pos: Option<Position>,
    parent: OnceLock<Weak<Inner>>,
    root: OnceLock<Weak<Inner>>,
    context: Arc<Context>,
    related: Mutex<HashMap<String, Value>>,
}

/// The immutable collection wrapper.
#[derive(Clone)]
pub struct Node(pub(crate) Arc<Inner>);

impl Node {
    // ---- construction entry points -------------------------------------

    /// Wraps plain data in raw mode with default collaborators.
    pub fn create(input: impl Into<Raw>) -> Result<Node> {
        Builder::new().build(input)
    }

    /// Wraps plain data in escaped mode with default collaborators.
    pub fn create_escaped(input: impl Into<Raw>) -> Result<Node> {
        Builder::new().escaped(true).build(input)
    }

    /// Wraps plain data, choosing the mode from `escaping`.
    pub fn create_with(input: impl Into<Raw>, escaping: bool) -> Result<Node> {
        Builder::new().escaped(escaping).build(input)
    }

    /// Starts a builder for injecting collaborators.
    pub fn builder() -> Builder {
        Builder::new()
    }

    // ---- internal construction -----------------------------------------

    pub(crate) fn from_parts(
        entries: IndexMap<Key, Value>,
        mode: Mode,
        pos: Option<Position>,
        context: Arc<Context>,
    ) -> Node {
        Node(Arc::new(Inner {
            entries,
            mode,
            pos,
            parent: OnceLock::new(),
            root: OnceLock::new(),
            context,
            related: Mutex::new(HashMap::new()),
        }))
    }

    /// Shallow copy with fresh metadata; grandchildren stay shared.
    pub(crate) fn repositioned(&self, pos: Position, mode: Mode) -> Node {
        Node::from_parts(self.0.entries.clone(), mode, Some(pos), self.0.context.clone())
    }

    /// Builds an unlinked node from transform output: immediate child nodes
    /// get fresh positions and re-anchored copies.
    pub(crate) fn assemble(&self, mode: Mode, entries: Vec<(Key, Value)>) -> Node {
        let len = entries.len();
        let mut map = IndexMap::with_capacity(len);
        for (index, (key, value)) in entries.into_iter().enumerate() {
            let value = match value {
                Value::Node(child) => {
                    Value::Node(child.repositioned(Position::of(index, len), mode))
                }
                scalar => scalar,
            };
            map.insert(key, value);
        }
        Node::from_parts(map, mode, None, self.0.context.clone())
    }

    pub(crate) fn rebuild(&self, entries: Vec<(Key, Value)>) -> Node {
        self.rebuild_as(self.mode(), entries)
    }

    pub(crate) fn rebuild_as(&self, mode: Mode, entries: Vec<(Key, Value)>) -> Node {
        let node = self.assemble(mode, entries);
        node.link_tree();
        node
    }

    /// Wires parent/root links through a freshly built tree. `OnceLock`
    /// ignores repeat sets, so subtrees shared from an older tree keep
    /// their original anchors.
    pub(crate) fn link_tree(&self) {
        self.link_from(None, self);
    }

    fn link_from(&self, parent: Option<&Node>, root: &Node) {
        if let Some(p) = parent {
            let _ = self.0.parent.set(Arc::downgrade(&p.0));
        }
        let _ = self.0.root.set(Arc::downgrade(&root.0));
        for value in self.0.entries.values() {
            if let Value::Node(child) = value {
                child.link_from(Some(self), root);
            }
        }
    }

    pub(crate) fn context_arc(&self) -> Arc<Context> {
        self.0.context.clone()
    }

    // ---- basic accessors -----------------------------------------------

    /// The presentation mode of this node.
    pub fn mode(&self) -> Mode {
        self.0.mode
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.entries.len()
    }

    /// Returns true if the node has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.entries.is_empty()
    }

    /// Returns true if the node has at least one entry.
    pub fn is_not_empty(&self) -> bool {
        !self.is_empty()
    }

    /// Position of this node among its siblings; `None` for a root.
    pub fn position(&self) -> Option<Position> {
        self.0.pos
    }

    /// The enclosing node.
    ///
    /// Returns `None` for a root, and also when the parent tree has been
    /// dropped while this child handle was kept alive (back-links are
    /// non-owning).
    pub fn parent(&self) -> Option<Node> {
        self.0.parent.get().and_then(Weak::upgrade).map(Node)
    }

    /// The top-most ancestor; a root returns itself.
    pub fn root(&self) -> Node {
        self.0
            .root
            .get()
            .and_then(Weak::upgrade)
            .map(Node)
            .unwrap_or_else(|| self.clone())
    }

    /// Returns true if `other` is the same allocation.
    pub fn ptr_eq(&self, other: &Node) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Diagnostic path of this node from its root, e.g. `$.users.2`.
    pub fn path(&self) -> String {
        match self.parent() {
            None => "$".to_string(),
            Some(parent) => {
                let key = parent
                    .0
                    .entries
                    .iter()
                    .find_map(|(k, v)| match v {
                        Value::Node(n) if Arc::ptr_eq(&n.0, &self.0) => Some(k.to_string()),
                        _ => None,
                    })
                    .unwrap_or_else(|| "?".to_string());
                format!("{}.{key}", parent.path())
            }
        }
    }

    /// The side-channel bag attached at construction.
    pub fn extensions(&self) -> &Extensions {
        &self.0.context.extensions
    }

    // ---- lookup ----------------------------------------------------------

    /// Looks up an entry by key.
    ///
    /// A missing key yields a chain-safe [`Absent`] sentinel and emits a
    /// policy-gated missing-key diagnostic; it never panics.
    pub fn get(&self, key: impl Into<Key>) -> Item {
        let key = key.into();
        match self.0.entries.get_full(&key) {
            Some((index, stored_key, value)) => self.item_for(index, stored_key, value),
            None => {
                let path = self.path();
                diag::missing_key(&key, &path);
                Item::Absent(Absent::new(key, path, self.context_arc()))
            }
        }
    }

    /// Looks up an entry by key, substituting `default` when absent.
    ///
    /// No missing-key diagnostic is emitted: supplying a default declares
    /// the absence expected.
    pub fn get_or(&self, key: impl Into<Key>, default: impl Into<Raw>) -> Item {
        let key = key.into();
        if let Some((index, stored_key, value)) = self.0.entries.get_full(&key) {
            return self.item_for(index, stored_key, value);
        }
        match self.wrap_detached(default.into()) {
            Ok(value) => self.detached_item(key, &value),
            Err(_) => Item::Absent(Absent::new(key, self.path(), self.context_arc())),
        }
    }

    /// Property-style access; same lookup as [`Node::get`].
    pub fn field(&self, name: &str) -> Item {
        self.get(name)
    }

    /// Array-style access; same lookup as [`Node::get`].
    pub fn at(&self, index: usize) -> Item {
        self.get(index)
    }

    /// Returns true if `key` is present.
    pub fn contains_key(&self, key: impl Into<Key>) -> bool {
        self.0.entries.contains_key(&key.into())
    }

    /// Returns true if any stored value loosely equals `value`.
    ///
    /// Scalars compare with the loose semantics of `where_*`; nested nodes
    /// compare structurally against collection values.
    pub fn contains(&self, value: impl Into<Raw>) -> bool {
        let raw = value.into();
        self.0.entries.values().any(|v| v.loose_eq(&raw))
    }

    // ---- positional access ---------------------------------------------

    /// First element in iteration order.
    pub fn first(&self) -> Item {
        self.nth(0)
    }

    /// Last element in iteration order.
    pub fn last(&self) -> Item {
        self.nth(-1)
    }

    /// Element at position `index` in iteration order, ignoring keys.
    ///
    /// Negative indices count from the end (`-1` is the last element).
    /// Out-of-range yields [`Absent`] without a missing-key diagnostic:
    /// positional probing is not a data error.
    pub fn nth(&self, index: i64) -> Item {
        let len = self.len() as i64;
        let resolved = if index < 0 { len + index } else { index };
        if resolved < 0 || resolved >= len {
            let key = Key::Name(index.to_string());
            return Item::Absent(Absent::new(key, self.path(), self.context_arc()));
        }
        match self.0.entries.get_index(resolved as usize) {
            Some((key, value)) => self.item_for(resolved as usize, key, value),
            None => {
                let key = Key::Name(index.to_string());
                Item::Absent(Absent::new(key, self.path(), self.context_arc()))
            }
        }
    }

    // ---- iteration and listing -----------------------------------------

    /// Iterates entries in insertion order as `(Key, Item)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Key, Item)> + '_ {
        self.0
            .entries
            .iter()
            .enumerate()
            .map(move |(index, (key, value))| (key.clone(), self.item_for(index, key, value)))
    }

    /// New node listing this node's keys as values, re-indexed `0..n`.
    pub fn keys(&self) -> Node {
        let entries = self
            .0
            .entries
            .keys()
            .enumerate()
            .map(|(i, key)| {
                let scalar = match key {
                    Key::Index(n) => crate::scalar::Scalar::Int(*n as i64),
                    Key::Name(name) => crate::scalar::Scalar::Text(name.clone()),
                };
                (Key::Index(i), Value::Scalar(scalar))
            })
            .collect();
        self.rebuild(entries)
    }

    /// New node listing this node's values, re-indexed `0..n`.
    pub fn values(&self) -> Node {
        let entries = self
            .0
            .entries
            .values()
            .enumerate()
            .map(|(i, value)| (Key::Index(i), value.clone()))
            .collect();
        self.rebuild(entries)
    }

    // ---- materialization -----------------------------------------------

    /// Recursively unwraps to plain nested raw data — the inverse of
    /// normalization. Always raw regardless of mode.
    ///
    /// Sequential `0..n` integer-keyed nodes materialize as lists, all
    /// other nodes as string-keyed maps.
    pub fn materialize(&self) -> Raw {
        let sequential = self
            .0
            .entries
            .keys()
            .enumerate()
            .all(|(i, key)| *key == Key::Index(i));
        if sequential {
            Raw::List(self.0.entries.values().map(Value::materialize).collect())
        } else {
            Raw::Map(
                self.0
                    .entries
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.materialize()))
                    .collect(),
            )
        }
    }

    /// Superseded name for [`Node::materialize`].
    #[deprecated(note = "superseded by `materialize`")]
    pub fn to_array(&self) -> Raw {
        diag::deprecated("to_array is superseded by materialize");
        self.materialize()
    }

    /// Serializes the materialized shape as JSON text.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&self.materialize()).map_err(Into::into)
    }

    // ---- related loading -------------------------------------------------

    /// Resolves a foreign-key-like field through the injected loader.
    ///
    /// The loader is invoked at most once per node/column pair; the result
    /// is memoized on this node. Fails if no loader was injected.
    pub fn related(&self, column: &str) -> Result<Item> {
        {
            let cache = self.0.related.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(value) = cache.get(column) {
                return Ok(self.detached_item(Key::Name(column.to_string()), value));
            }
        }
        let loader = self
            .0
            .context
            .extensions
            .get::<Loader>()
            .cloned()
            .ok_or(NodeError::LoaderMissing)?;
        let raw = loader.0.load(self, column)?;
        let value = self.wrap_related(raw)?;
        let mut cache = self.0.related.lock().unwrap_or_else(|e| e.into_inner());
        let value = cache.entry(column.to_string()).or_insert(value);
        Ok(self.detached_item(Key::Name(column.to_string()), value))
    }

    // ---- item construction ----------------------------------------------

    fn item_for(&self, index: usize, key: &Key, value: &Value) -> Item {
        match value {
            Value::Node(node) => Item::Node(node.clone()),
            Value::Scalar(scalar) => Item::Leaf(Leaf::new(
                scalar.clone(),
                self.mode(),
                self.context_arc(),
                Some(Position::of(index, self.len())),
                self.clone(),
                key.clone(),
            )),
        }
    }

    fn detached_item(&self, key: Key, value: &Value) -> Item {
        match value {
            Value::Node(node) => Item::Node(node.clone()),
            Value::Scalar(scalar) => Item::Leaf(Leaf::new(
                scalar.clone(),
                self.mode(),
                self.context_arc(),
                None,
                self.clone(),
                key,
            )),
        }
    }

    /// Wraps loader output: collections become a child linked under this
    /// node, scalars stay leaves.
    fn wrap_related(&self, raw: Raw) -> Result<Value> {
        if raw.is_collection() {
            let child = normalize::build_unlinked(raw, self.mode(), &self.0.context)?;
            child.link_from(Some(self), &self.root());
            Ok(Value::Node(child))
        } else {
            Ok(Value::Scalar(normalize::finite_scalar(raw)?))
        }
    }

    /// Wraps a caller-supplied default as a standalone value.
    fn wrap_detached(&self, raw: Raw) -> Result<Value> {
        if raw.is_collection() {
            let node = normalize::build_unlinked(raw, self.mode(), &self.0.context)?;
            node.link_tree();
            Ok(Value::Node(node))
        } else {
            Ok(Value::Scalar(normalize::finite_scalar(raw)?))
        }
    }
}

impl PartialEq for Node {
    /// Structural equality over mode and entries, in order. Position
    /// metadata and back-links are not compared.
    fn eq(&self, other: &Self) -> bool {
        self.0.mode == other.0.mode
            && self.0.entries.len() == other.0.entries.len()
            && self
                .0
                .entries
                .iter()
                .zip(other.0.entries.iter())
                .all(|((ka, va), (kb, vb))| ka == kb && va == vb)
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("mode", &self.0.mode)
            .field("entries", &self.0.entries)
            .finish()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.materialize().to_json_string())
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.materialize().serialize(serializer)
    }
}

/// Configures collaborators and builds a tree.
///
/// # Examples
///
/// ```
/// use espalier::{Node, QueryStats};
/// use serde_json::json;
///
/// let tree = Node::builder()
///     .escaped(true)
///     .extension(QueryStats { num_rows: 2, ..Default::default() })
///     .build(json!([{"id": 1}, {"id": 2}]))?;
/// assert_eq!(tree.root().extensions().get::<QueryStats>().unwrap().num_rows, 2);
/// # Ok::<(), espalier::Error>(())
/// ```
pub struct Builder {
    mode: Mode,
    escaper: Arc<dyn Escape>,
    responder: Arc<dyn Respond>,
    extensions: Extensions,
}

impl Builder {
    /// Starts from raw mode and default collaborators.
    pub fn new() -> Self {
        Self {
            mode: Mode::Raw,
            escaper: Arc::new(HtmlEscaper),
            responder: Arc::new(NoRespond),
            extensions: Extensions::new(),
        }
    }

    /// Chooses escaped or raw mode.
    pub fn escaped(mut self, escaped: bool) -> Self {
        self.mode = if escaped { Mode::Escaped } else { Mode::Raw };
        self
    }

    /// Sets the mode directly.
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Injects an escaping wrapper.
    pub fn escaper(mut self, escaper: impl Escape + 'static) -> Self {
        self.escaper = Arc::new(escaper);
        self
    }

    /// Injects a termination responder for the shortcut operations.
    pub fn responder(mut self, responder: impl Respond + 'static) -> Self {
        self.responder = Arc::new(responder);
        self
    }

    /// Attaches opaque side-channel data, reachable via `extensions()`.
    pub fn extension<T: Any + Send + Sync>(mut self, value: T) -> Self {
        self.extensions.insert(value);
        self
    }

    /// Injects a related-record loader.
    pub fn loader(self, loader: impl LoadRelated + 'static) -> Self {
        self.extension(Loader::new(loader))
    }

    /// Normalizes `input` into a tree.
    pub fn build(self, input: impl Into<Raw>) -> Result<Node> {
        let context = Arc::new(Context {
            escaper: self.escaper,
            responder: self.responder,
            extensions: self.extensions,
        });
        normalize::normalize(input.into(), self.mode, context)
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

//! Transformation operations.
//!
//! Every operation here is pure: the receiver is unchanged and a new node
//! comes back, with position metadata recomputed for the output's
//! immediate children. Operations that can receive a structurally invalid
//! argument return `Result`; operations that skip rows (`pluck`,
//! `index_by`, `group_by`) emit a policy-gated missing-key diagnostic for
//! each skipped row and keep going.

use indexmap::IndexMap;

use crate::diag;
use crate::key::Key;
use crate::raw::Raw;
use crate::scalar::Scalar;
use crate::Result;

use super::{normalize, Item, Mode, Node, NodeError, Value};

impl Node {
    /// Drops falsy values: null, `false`, zero, the empty string, and
    /// empty collections. Original keys are preserved.
    pub fn filter(&self) -> Node {
        let entries = self
            .0
            .entries
            .iter()
            .filter(|(_, value)| value.is_truthy())
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        self.rebuild(entries)
    }

    /// Keeps entries for which `predicate` returns true. The predicate
    /// receives the stored raw value; original keys are preserved.
    pub fn filter_with<F>(&self, predicate: F) -> Node
    where
        F: Fn(&Value) -> bool,
    {
        let entries = self
            .0
            .entries
            .iter()
            .filter(|(_, value)| predicate(value))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        self.rebuild(entries)
    }

    /// Keeps rows where `field` loosely equals `value`. Shorthand for
    /// [`Node::where_all`] with a single condition.
    pub fn where_eq(&self, field: &str, value: impl Into<Raw>) -> Node {
        self.where_all([(field, value)])
    }

    /// Keeps only nested rows where every condition field loosely equals
    /// its value (numeric-string vs. number tolerant). Scalar elements
    /// never match. Original keys are preserved.
    pub fn where_all<I, K, V>(&self, conditions: I) -> Node
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Raw>,
    {
        let conditions: Vec<(String, Raw)> = conditions
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let entries = self
            .0
            .entries
            .iter()
            .filter(|(_, value)| match value {
                Value::Node(row) => conditions.iter().all(|(field, expected)| {
                    row.0
                        .entries
                        .get(&Key::Name(field.clone()))
                        .map(|found| found.loose_eq(expected))
                        .unwrap_or(false)
                }),
                Value::Scalar(_) => false,
            })
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        self.rebuild(entries)
    }

    /// Removes later duplicates by loose raw-value equality, keeping the
    /// first occurrence and its key. Flat collections only.
    pub fn unique(&self) -> Result<Node> {
        self.require_flat("unique")?;
        let mut seen: Vec<Scalar> = Vec::new();
        let mut entries = Vec::new();
        for (key, value) in &self.0.entries {
            if let Value::Scalar(scalar) = value {
                if seen.iter().any(|kept| kept.loose_eq(scalar)) {
                    continue;
                }
                seen.push(scalar.clone());
                entries.push((key.clone(), value.clone()));
            }
        }
        Ok(self.rebuild(entries))
    }

    /// Sorts ascending by value — numeric when both sides read as numbers,
    /// lexical otherwise. Flat collections only; output re-indexed.
    pub fn sort(&self) -> Result<Node> {
        self.require_flat("sort")?;
        let mut scalars: Vec<Scalar> = self
            .0
            .entries
            .values()
            .filter_map(|v| v.as_scalar().cloned())
            .collect();
        scalars.sort_by(|a, b| a.compare(b));
        let entries = scalars
            .into_iter()
            .enumerate()
            .map(|(i, scalar)| (Key::Index(i), Value::Scalar(scalar)))
            .collect();
        Ok(self.rebuild(entries))
    }

    /// Sorts rows ascending by the named column's raw value; stable for
    /// equal keys. Rows only; output re-indexed. Rows missing the column
    /// sort as null.
    pub fn sort_by(&self, column: &str) -> Result<Node> {
        self.require_rows("sort_by")?;
        let key = Key::Name(column.to_string());
        let mut rows: Vec<(Scalar, Value)> = self
            .0
            .entries
            .values()
            .map(|value| {
                let sort_key = value
                    .as_node()
                    .and_then(|row| row.0.entries.get(&key))
                    .and_then(Value::as_scalar)
                    .cloned()
                    .unwrap_or(Scalar::Null);
                (sort_key, value.clone())
            })
            .collect();
        rows.sort_by(|a, b| a.0.compare(&b.0));
        let entries = rows
            .into_iter()
            .enumerate()
            .map(|(i, (_, value))| (Key::Index(i), value))
            .collect();
        Ok(self.rebuild(entries))
    }

    /// Re-keys rows by the stringified value of `column`. Later rows
    /// overwrite earlier ones on collision; rows missing the column are
    /// skipped with a missing-key diagnostic.
    pub fn index_by(&self, column: &str) -> Node {
        let key = Key::Name(column.to_string());
        let mut indexed: IndexMap<Key, Value> = IndexMap::new();
        for (row_key, value) in &self.0.entries {
            match self.row_column(value, &key) {
                Some(scalar) => {
                    indexed.insert(Key::Name(scalar.to_string()), value.clone());
                }
                None => self.skip_row(row_key, column, "index_by"),
            }
        }
        self.rebuild(indexed.into_iter().collect())
    }

    /// Groups rows by the stringified value of `column`. Groups appear in
    /// order of first key appearance, rows in original relative order;
    /// rows missing the column are skipped with a missing-key diagnostic.
    pub fn group_by(&self, column: &str) -> Node {
        let key = Key::Name(column.to_string());
        let mut groups: IndexMap<String, Vec<(Key, Value)>> = IndexMap::new();
        for (row_key, value) in &self.0.entries {
            match self.row_column(value, &key) {
                Some(scalar) => {
                    let bucket = groups.entry(scalar.to_string()).or_default();
                    bucket.push((Key::Index(bucket.len()), value.clone()));
                }
                None => self.skip_row(row_key, column, "group_by"),
            }
        }
        let entries = groups
            .into_iter()
            .map(|(group, rows)| {
                let inner = self.assemble(self.mode(), rows);
                (Key::Name(group), Value::Node(inner))
            })
            .collect();
        self.rebuild(entries)
    }

    /// Extracts `column` from every row into a new flat re-indexed node.
    /// Rows missing the column are skipped with a missing-key diagnostic.
    pub fn pluck(&self, column: &str) -> Node {
        let key = Key::Name(column.to_string());
        let mut entries = Vec::new();
        for (row_key, value) in &self.0.entries {
            match value.as_node().and_then(|row| row.0.entries.get(&key)) {
                Some(found) => entries.push((Key::Index(entries.len()), found.clone())),
                None => self.skip_row(row_key, column, "pluck"),
            }
        }
        self.rebuild(entries)
    }

    /// Extracts the field at position `index` from every row into a new
    /// flat re-indexed node. Rows without that position are skipped with a
    /// diagnostic.
    pub fn pluck_nth(&self, index: usize) -> Node {
        let mut entries = Vec::new();
        for (row_key, value) in &self.0.entries {
            match value.as_node().and_then(|row| row.0.entries.get_index(index)) {
                Some((_, found)) => entries.push((Key::Index(entries.len()), found.clone())),
                None => self.skip_row(row_key, &index.to_string(), "pluck_nth"),
            }
        }
        self.rebuild(entries)
    }

    /// Splits into consecutive sub-collections of at most `size` elements,
    /// preserving order and re-indexing within each chunk.
    pub fn chunk(&self, size: usize) -> Result<Node> {
        if size == 0 {
            return Err(NodeError::InvalidChunkSize.into());
        }
        let values: Vec<Value> = self.0.entries.values().cloned().collect();
        let entries = values
            .chunks(size)
            .enumerate()
            .map(|(i, window)| {
                let rows = window
                    .iter()
                    .enumerate()
                    .map(|(j, value)| (Key::Index(j), value.clone()))
                    .collect();
                (Key::Index(i), Value::Node(self.assemble(self.mode(), rows)))
            })
            .collect();
        Ok(self.rebuild(entries))
    }

    /// Combines this node with `others`, in order. Integer-keyed entries
    /// are renumbered sequentially across all inputs; name-keyed entries
    /// are overwritten by later inputs on collision.
    pub fn merge<I>(&self, others: I) -> Node
    where
        I: IntoIterator<Item = Node>,
    {
        let mut merged: IndexMap<Key, Value> = IndexMap::new();
        let mut next_index = 0usize;
        for source in std::iter::once(self.clone()).chain(others) {
            for (key, value) in &source.0.entries {
                match key {
                    Key::Index(_) => {
                        merged.insert(Key::Index(next_index), value.clone());
                        next_index += 1;
                    }
                    Key::Name(name) => {
                        merged.insert(Key::Name(name.clone()), value.clone());
                    }
                }
            }
        }
        self.rebuild(merged.into_iter().collect())
    }

    /// Applies `f` to each element's materialized raw value and
    /// re-normalizes the output, so returned nested structures are
    /// re-wrapped. Keys and shape are preserved.
    pub fn map<F>(&self, f: F) -> Result<Node>
    where
        F: Fn(Raw) -> Raw,
    {
        let mut entries = Vec::with_capacity(self.len());
        for (key, value) in &self.0.entries {
            let out = f(value.materialize());
            entries.push((key.clone(), self.wrap_output(out)?));
        }
        Ok(self.rebuild(entries))
    }

    /// Like [`Node::map`], but `f` receives the mode-aware read handle
    /// instead of raw data — the wrapper-level variant.
    pub fn smart_map<F>(&self, f: F) -> Result<Node>
    where
        F: Fn(&Item) -> Raw,
    {
        let mut entries = Vec::with_capacity(self.len());
        for (index, (key, value)) in self.0.entries.iter().enumerate() {
            let item = self.item_for(index, key, value);
            let out = f(&item);
            entries.push((key.clone(), self.wrap_output(out)?));
        }
        Ok(self.rebuild(entries))
    }

    /// Invokes `f` on each element for side effects and returns the
    /// receiver unchanged, so the chain continues. Like
    /// [`Node::smart_map`], `f` sees the mode-aware handle.
    pub fn each<F>(&self, mut f: F) -> &Node
    where
        F: FnMut(&Key, &Item),
    {
        for (index, (key, value)) in self.0.entries.iter().enumerate() {
            let item = self.item_for(index, key, value);
            f(key, &item);
        }
        self
    }

    /// Joins scalar elements into one string, separator verbatim. Flat
    /// collections only. In escaped mode each element is escaped before
    /// joining; the result needs no further escaping.
    pub fn implode(&self, separator: &str) -> Result<String> {
        self.require_flat("implode")?;
        let mut out = String::new();
        for (i, value) in self.0.entries.values().enumerate() {
            if i > 0 {
                out.push_str(separator);
            }
            if let Value::Scalar(scalar) = value {
                match self.mode() {
                    Mode::Raw => out.push_str(&scalar.to_string()),
                    Mode::Escaped => {
                        out.push_str(self.0.context.escaper.escape(scalar).as_str())
                    }
                }
            }
        }
        Ok(out)
    }

    /// Renders every element through a template with `{value}` and `{key}`
    /// placeholders (`%s` is accepted as a positional alias for the
    /// value). Values substitute mode-aware — escaped on an escaped node —
    /// and the result is always a raw-mode node: pre-formatted text must
    /// not be re-escaped.
    pub fn sprintf(&self, template: &str) -> Node {
        let entries = self
            .0
            .entries
            .iter()
            .map(|(key, value)| {
                let text = match value {
                    Value::Scalar(scalar) => match self.mode() {
                        Mode::Raw => scalar.to_string(),
                        Mode::Escaped => {
                            self.0.context.escaper.escape(scalar).into_inner()
                        }
                    },
                    Value::Node(node) => node.to_string(),
                };
                let line = template
                    .replace("{value}", &text)
                    .replace("{key}", &key.to_string())
                    .replace("%s", &text);
                (key.clone(), Value::Scalar(Scalar::Text(line)))
            })
            .collect();
        self.rebuild_as(Mode::Raw, entries)
    }

    /// Reverses iteration order; output re-indexed.
    pub fn reverse(&self) -> Node {
        let entries = self
            .0
            .entries
            .values()
            .rev()
            .enumerate()
            .map(|(i, value)| (Key::Index(i), value.clone()))
            .collect();
        self.rebuild(entries)
    }

    /// Entry count; alias of [`Node::len`].
    pub fn count(&self) -> usize {
        self.len()
    }

    // ---- helpers ---------------------------------------------------------

    fn require_flat(&self, operation: &'static str) -> Result<()> {
        if self.0.entries.values().any(|v| v.is_node()) {
            Err(NodeError::FlatCollectionRequired { operation }.into())
        } else {
            Ok(())
        }
    }

    fn require_rows(&self, operation: &'static str) -> Result<()> {
        if self.0.entries.values().any(|v| v.is_scalar()) {
            Err(NodeError::RowCollectionRequired { operation }.into())
        } else {
            Ok(())
        }
    }

    /// The scalar keying value of `column` in a row, or `None` when the
    /// element is not a row, the column is absent, or its value is nested.
    fn row_column(&self, value: &Value, column: &Key) -> Option<Scalar> {
        value
            .as_node()
            .and_then(|row| row.0.entries.get(column))
            .and_then(Value::as_scalar)
            .cloned()
    }

    fn skip_row(&self, row_key: &Key, column: &str, operation: &str) {
        diag::missing_key(
            &Key::Name(column.to_string()),
            &format!("{}.{row_key} ({operation})", self.path()),
        );
    }

    /// Wraps transform output: collections are re-normalized (unlinked —
    /// `rebuild` wires the links), scalars are checked finite.
    fn wrap_output(&self, raw: Raw) -> Result<Value> {
        if raw.is_collection() {
            let child = normalize::build_unlinked(raw, self.mode(), &self.0.context)?;
            Ok(Value::Node(child))
        } else {
            Ok(Value::Scalar(normalize::finite_scalar(raw)?))
        }
    }
}

//! Leaf scalar values.
//!
//! This module provides the [`Scalar`] enum for terminal values in a
//! collection tree, together with the loose-equality and ordering semantics
//! shared by `contains`, `where_*`, `unique` and `sort`. Structural values
//! (nested collections) live in [`crate::node`]; a scalar is always a leaf.

use std::any::Any;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// An arbitrary host value carried through a tree as an uninterpreted leaf.
///
/// Opaque values are preserved by normalization and materialization but are
/// never descended into, compared numerically, or serialized. Equality is
/// handle identity: two `Opaque`s are equal iff they wrap the same
/// allocation.
///
/// # Examples
///
/// ```
/// use espalier::Opaque;
///
/// let handle = Opaque::new(vec![1u8, 2, 3]);
/// assert_eq!(handle.downcast_ref::<Vec<u8>>(), Some(&vec![1u8, 2, 3]));
/// assert!(handle.type_name().contains("Vec"));
/// ```
#[derive(Clone)]
pub struct Opaque {
    value: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Opaque {
    /// Wraps a host value for pass-through storage.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            value: Arc::new(value),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Attempts to borrow the wrapped value as `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref()
    }

    /// The Rust type name of the wrapped value, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Opaque({})", self.type_name)
    }
}

impl PartialEq for Opaque {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

/// A terminal leaf value.
///
/// `Scalar` covers the value types that can sit at the leaves of a
/// collection tree. Nested collections are represented by
/// [`crate::node::Node`], never by a scalar.
///
/// # Loose equality
///
/// [`Scalar::loose_eq`] implements the comparison semantics used by
/// `contains` and `where_*`: numeric-looking text compares equal to the
/// number it spells (`"1"` equals `1`), integers and floats compare by
/// value, and booleans bridge to `1`/`0`. `Null` equals only `Null`, and
/// opaque values equal only themselves.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// Null/empty value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit float. Always finite inside a tree; normalization rejects
    /// `NaN` and infinities.
    Float(f64),
    /// UTF-8 text.
    Text(String),
    /// Preserved-but-uninterpreted host value.
    Opaque(Opaque),
}

impl Scalar {
    /// Returns true if this is the null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// Returns the type name as a string.
    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Null => "null",
            Scalar::Bool(_) => "bool",
            Scalar::Int(_) => "int",
            Scalar::Float(_) => "float",
            Scalar::Text(_) => "text",
            Scalar::Opaque(_) => "opaque",
        }
    }

    /// Attempts to convert to a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to convert to an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Scalar::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to convert to a float.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Scalar::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// Attempts to convert to text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to convert to an opaque handle.
    pub fn as_opaque(&self) -> Option<&Opaque> {
        match self {
            Scalar::Opaque(o) => Some(o),
            _ => None,
        }
    }

    /// The numeric reading of this scalar, if it has one.
    ///
    /// Integers and floats read as themselves; text reads as the number it
    /// spells (after trimming), all other variants have no numeric reading.
    pub fn number(&self) -> Option<f64> {
        match self {
            Scalar::Int(n) => Some(*n as f64),
            Scalar::Float(x) => Some(*x),
            Scalar::Text(s) => s.trim().parse::<f64>().ok().filter(|x| x.is_finite()),
            _ => None,
        }
    }

    /// Truthiness as used by the no-predicate `filter`: null, `false`,
    /// zero, and the empty string are falsy; everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Scalar::Null => false,
            Scalar::Bool(b) => *b,
            Scalar::Int(n) => *n != 0,
            Scalar::Float(x) => *x != 0.0,
            Scalar::Text(s) => !s.is_empty(),
            Scalar::Opaque(_) => true,
        }
    }

    /// Blankness as used by the shortcut operations: null, `false`, or the
    /// empty string. Note that zero is falsy but not blank.
    pub fn is_blank(&self) -> bool {
        match self {
            Scalar::Null => true,
            Scalar::Bool(b) => !*b,
            Scalar::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Loose equality: numeric-string tolerant, boolean-bridging.
    pub fn loose_eq(&self, other: &Scalar) -> bool {
        match (self, other) {
            (Scalar::Null, Scalar::Null) => true,
            (Scalar::Int(a), Scalar::Int(b)) => a == b,
            (Scalar::Text(a), Scalar::Text(b)) => a == b,
            (Scalar::Bool(a), Scalar::Bool(b)) => a == b,
            (Scalar::Opaque(a), Scalar::Opaque(b)) => a == b,
            (Scalar::Bool(b), other) | (other, Scalar::Bool(b)) => {
                other.number().map(|x| x == if *b { 1.0 } else { 0.0 }).unwrap_or(false)
            }
            (a, b) => match (a.number(), b.number()) {
                (Some(x), Some(y)) => x == y,
                _ => false,
            },
        }
    }

    /// Total ordering for `sort`: numeric when both sides have a numeric
    /// reading, lexical over the rendered text otherwise.
    pub fn compare(&self, other: &Scalar) -> Ordering {
        match (self.number(), other.number()) {
            (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
            _ => self.to_string().cmp(&other.to_string()),
        }
    }
}

/// Template-text rendering: null renders empty, everything else renders its
/// natural textual form. Escaping is applied on top of this by the node's
/// mode, never here.
impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => Ok(()),
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Int(n) => write!(f, "{n}"),
            Scalar::Float(x) => write!(f, "{x}"),
            Scalar::Text(s) => write!(f, "{s}"),
            Scalar::Opaque(o) => write!(f, "[{}]", o.type_name()),
        }
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Int(value as i64)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<Opaque> for Scalar {
    fn from(value: Opaque) -> Self {
        Scalar::Opaque(value)
    }
}

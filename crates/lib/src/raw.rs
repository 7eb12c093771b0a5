//! Plain nested data: the input to normalization and the output of
//! materialization.
//!
//! [`Raw`] is the interchange representation for everything outside the
//! tree: construction input, `materialize()` output, `map` callback values,
//! and JSON serialization. It is deliberately dumb — no modes, no position
//! metadata, no back-references — so it round-trips cleanly.

use indexmap::IndexMap;
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::scalar::{Opaque, Scalar};

/// Plain nested data of scalars, lists, and string-keyed maps.
///
/// Lists normalize to integer-keyed entries, maps to name-keyed entries.
/// Map iteration order is insertion order and is significant.
///
/// # Examples
///
/// ```
/// use espalier::Raw;
///
/// let data = Raw::map([
///     ("title", Raw::from("Solaris")),
///     ("tags", Raw::list(["sf", "classic"])),
/// ]);
/// assert!(data.is_collection());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Raw {
    /// Null/empty value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit float.
    Float(f64),
    /// UTF-8 text.
    Text(String),
    /// Preserved-but-uninterpreted host value. Not serializable.
    Opaque(Opaque),
    /// Ordered sequence.
    List(Vec<Raw>),
    /// Insertion-ordered string-keyed mapping.
    Map(IndexMap<String, Raw>),
}

impl Raw {
    /// Builds a list from anything convertible to raw values.
    pub fn list<I, T>(items: I) -> Raw
    where
        I: IntoIterator<Item = T>,
        T: Into<Raw>,
    {
        Raw::List(items.into_iter().map(Into::into).collect())
    }

    /// Builds a map from key/value pairs, preserving pair order.
    pub fn map<I, K, V>(pairs: I) -> Raw
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Raw>,
    {
        Raw::Map(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Returns true for lists and maps.
    pub fn is_collection(&self) -> bool {
        matches!(self, Raw::List(_) | Raw::Map(_))
    }

    /// Returns true for the null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Raw::Null)
    }

    /// The scalar reading of this value, if it is not a collection.
    pub fn as_scalar(&self) -> Option<Scalar> {
        match self {
            Raw::Null => Some(Scalar::Null),
            Raw::Bool(b) => Some(Scalar::Bool(*b)),
            Raw::Int(n) => Some(Scalar::Int(*n)),
            Raw::Float(x) => Some(Scalar::Float(*x)),
            Raw::Text(s) => Some(Scalar::Text(s.clone())),
            Raw::Opaque(o) => Some(Scalar::Opaque(o.clone())),
            Raw::List(_) | Raw::Map(_) => None,
        }
    }

    /// Converts to a `serde_json::Value`. Fails on opaque leaves.
    pub fn to_json(&self) -> crate::Result<serde_json::Value> {
        serde_json::to_value(self).map_err(Into::into)
    }

    /// JSON-like rendering for display and debugging. Opaque leaves render
    /// as their bracketed type name instead of failing.
    pub fn to_json_string(&self) -> String {
        match self {
            Raw::Null => "null".to_string(),
            Raw::Bool(b) => b.to_string(),
            Raw::Int(n) => n.to_string(),
            Raw::Float(x) => x.to_string(),
            Raw::Text(s) => format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\"")),
            Raw::Opaque(o) => format!("\"[{}]\"", o.type_name()),
            Raw::List(items) => {
                let mut out = String::from("[");
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    out.push_str(&item.to_json_string());
                }
                out.push(']');
                out
            }
            Raw::Map(map) => {
                let mut out = String::from("{");
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    out.push_str(&format!("\"{}\":{}", k.replace('"', "\\\""), v.to_json_string()));
                }
                out.push('}');
                out
            }
        }
    }
}

impl From<Scalar> for Raw {
    fn from(value: Scalar) -> Self {
        match value {
            Scalar::Null => Raw::Null,
            Scalar::Bool(b) => Raw::Bool(b),
            Scalar::Int(n) => Raw::Int(n),
            Scalar::Float(x) => Raw::Float(x),
            Scalar::Text(s) => Raw::Text(s),
            Scalar::Opaque(o) => Raw::Opaque(o),
        }
    }
}

impl From<bool> for Raw {
    fn from(value: bool) -> Self {
        Raw::Bool(value)
    }
}

impl From<i64> for Raw {
    fn from(value: i64) -> Self {
        Raw::Int(value)
    }
}

impl From<i32> for Raw {
    fn from(value: i32) -> Self {
        Raw::Int(value as i64)
    }
}

impl From<usize> for Raw {
    fn from(value: usize) -> Self {
        Raw::Int(value as i64)
    }
}

impl From<f64> for Raw {
    fn from(value: f64) -> Self {
        Raw::Float(value)
    }
}

impl From<&str> for Raw {
    fn from(value: &str) -> Self {
        Raw::Text(value.to_string())
    }
}

impl From<String> for Raw {
    fn from(value: String) -> Self {
        Raw::Text(value)
    }
}

impl From<Opaque> for Raw {
    fn from(value: Opaque) -> Self {
        Raw::Opaque(value)
    }
}

impl<T: Into<Raw>> From<Vec<T>> for Raw {
    fn from(items: Vec<T>) -> Self {
        Raw::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Raw>> From<Option<T>> for Raw {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Raw::Null)
    }
}

impl From<IndexMap<String, Raw>> for Raw {
    fn from(map: IndexMap<String, Raw>) -> Self {
        Raw::Map(map)
    }
}

impl From<serde_json::Value> for Raw {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Raw::Null,
            serde_json::Value::Bool(b) => Raw::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Raw::Int(i)
                } else {
                    Raw::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Raw::Text(s),
            serde_json::Value::Array(items) => {
                Raw::List(items.into_iter().map(Raw::from).collect())
            }
            serde_json::Value::Object(map) => Raw::Map(
                map.into_iter()
                    .map(|(k, v)| (k, Raw::from(v)))
                    .collect(),
            ),
        }
    }
}

impl Serialize for Raw {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Raw::Null => serializer.serialize_unit(),
            Raw::Bool(b) => serializer.serialize_bool(*b),
            Raw::Int(n) => serializer.serialize_i64(*n),
            Raw::Float(x) => serializer.serialize_f64(*x),
            Raw::Text(s) => serializer.serialize_str(s),
            Raw::Opaque(o) => Err(serde::ser::Error::custom(format!(
                "opaque value of type {} cannot be serialized",
                o.type_name()
            ))),
            Raw::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Raw::Map(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Raw {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(Raw::from(value))
    }
}

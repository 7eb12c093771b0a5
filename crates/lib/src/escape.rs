//! The escaping-wrapper boundary.
//!
//! The core never decides *how* to escape, only *when*: a node in escaped
//! mode renders its leaves through the tree's [`Escape`] implementation.
//! [`HtmlEscaper`] ships as the default so trees are usable without wiring;
//! inject a different implementation through
//! [`Builder::escaper`](crate::Builder::escaper).

use std::fmt;

use crate::scalar::Scalar;

/// Markup-safe text produced by an [`Escape`] implementation.
///
/// The wrapper is the only way escaped text enters rendered output;
/// [`Safe::into_inner`] is the `unwrap` direction of the boundary contract.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Safe(String);

impl Safe {
    /// Wraps text the caller asserts is already safe for the output
    /// context.
    pub fn new(text: impl Into<String>) -> Self {
        Safe(text.into())
    }

    /// Borrows the safe text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Unwraps back to the plain string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Safe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Safe {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Scalar-to-safe-text transform. Must be pure and total over the scalar
/// domain.
pub trait Escape: Send + Sync {
    /// Renders `raw` as safe text for the target output context.
    fn escape(&self, raw: &Scalar) -> Safe;
}

/// Default escaper for HTML text content and attribute values.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlEscaper;

impl Escape for HtmlEscaper {
    fn escape(&self, raw: &Scalar) -> Safe {
        let text = raw.to_string();
        let mut out = String::with_capacity(text.len());
        for ch in text.chars() {
            match ch {
                '&' => out.push_str("&amp;"),
                '<' => out.push_str("&lt;"),
                '>' => out.push_str("&gt;"),
                '"' => out.push_str("&quot;"),
                '\'' => out.push_str("&#39;"),
                _ => out.push(ch),
            }
        }
        Safe(out)
    }
}

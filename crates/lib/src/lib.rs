//!
//! Espalier: fluent, immutable, escape-aware collection trees.
//! This library wraps plain nested data for safe consumption by rendering
//! code: ordered, position-annotated, chainable, and escaping-aware.
//!
//! ## Core Concepts
//!
//! * **Nodes (`node::Node`)**: the immutable collection wrapper. Built once
//!   from plain data; every transformation returns a fresh node.
//! * **Modes (`node::Mode`)**: leaf scalars surface raw or through the
//!   escaping wrapper. Storage is always raw; conversion is explicit and
//!   idempotent.
//! * **Items (`node::Item`)**: the unified read surface. Lookups yield a
//!   nested node, a mode-aware leaf, or a chain-safe absent sentinel —
//!   chained access on missing data never panics.
//! * **Positions (`node::Position`)**: 1-based position and first/last
//!   flags for loop rendering, assigned when an element is inserted into
//!   its parent.
//! * **Raw data (`raw::Raw`)**: the plain interchange representation;
//!   `materialize()` is the inverse of construction.
//! * **Collaborators**: escaping (`escape::Escape`), diagnostics
//!   (`diag::Sink`), lazy loading (`loader::LoadRelated`), termination
//!   responders (`node::Respond`), and opaque passthrough metadata
//!   (`extensions::Extensions`) all sit behind narrow trait boundaries.
//!
//! ## Example
//!
//! ```
//! use espalier::Node;
//! use serde_json::json;
//!
//! let books = Node::create(json!([
//!     {"id": 10, "name": "Solaris"},
//!     {"id": 20, "name": "Middlemarch"},
//! ]))?;
//! assert_eq!(books.pluck("id").implode(",")?, "10,20");
//! # Ok::<(), espalier::Error>(())
//! ```

pub mod diag;
pub mod escape;
pub mod extensions;
pub mod key;
pub mod loader;
pub mod node;
pub mod raw;
pub mod scalar;

pub use escape::{Escape, HtmlEscaper, Safe};
pub use extensions::{Extensions, QueryStats};
pub use key::Key;
pub use loader::{LoadRelated, Loader};
pub use node::{
    Absent, Builder, Item, Leaf, Mode, Node, NodeError, NoRespond, Position, Respond, Shortcut,
    Value,
};
pub use raw::Raw;
pub use scalar::{Opaque, Scalar};

/// Result type used throughout the library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured construction/transformation errors from the node module.
    #[error(transparent)]
    Node(node::NodeError),

    /// Chain-stopping outcomes of the shortcut operations.
    #[error(transparent)]
    Shortcut(node::Shortcut),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Serialize(_) => "serialize",
            Error::Node(_) => "node",
            Error::Shortcut(_) => "shortcut",
        }
    }

    /// Check if this error indicates unmodelable construction input.
    pub fn is_invalid_input(&self) -> bool {
        match self {
            Error::Node(err) => err.is_invalid_input(),
            _ => false,
        }
    }

    /// Check if this error indicates a structurally invalid operation
    /// argument.
    pub fn is_invalid_argument(&self) -> bool {
        match self {
            Error::Node(err) => err.is_invalid_argument(),
            _ => false,
        }
    }

    /// Check if this error is a shortcut outcome.
    pub fn is_shortcut(&self) -> bool {
        matches!(self, Error::Shortcut(_))
    }

    /// Check if this error is the not-found shortcut outcome.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Shortcut(shortcut) => shortcut.is_not_found(),
            _ => false,
        }
    }

    /// Check if this error is the redirect shortcut outcome.
    pub fn is_redirect(&self) -> bool {
        match self {
            Error::Shortcut(shortcut) => shortcut.is_redirect(),
            _ => false,
        }
    }

    /// Check if this error is serialization-related.
    pub fn is_serialization_error(&self) -> bool {
        matches!(self, Error::Serialize(_))
    }
}

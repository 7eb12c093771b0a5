//! Lazy related-record loading.
//!
//! A collaborator can resolve foreign-key-like fields into related data on
//! demand. The callback is injected through [`Extensions`] at construction
//! and invoked only when a consumer explicitly calls
//! [`Node::related`](crate::Node::related); results are memoized per
//! node/column pair, so the callback runs at most once for each.

use std::fmt;
use std::sync::Arc;

use crate::node::Node;
use crate::raw::Raw;
use crate::Result;

/// Resolves a foreign-key-like field on a row into related data.
pub trait LoadRelated: Send + Sync {
    /// Loads the data related to `row` through `column`.
    fn load(&self, row: &Node, column: &str) -> Result<Raw>;
}

impl<F> LoadRelated for F
where
    F: Fn(&Node, &str) -> Result<Raw> + Send + Sync,
{
    fn load(&self, row: &Node, column: &str) -> Result<Raw> {
        self(row, column)
    }
}

/// Handle stored in [`Extensions`](crate::Extensions) to inject a loader.
#[derive(Clone)]
pub struct Loader(pub Arc<dyn LoadRelated>);

impl Loader {
    /// Wraps a loader implementation for injection.
    pub fn new(loader: impl LoadRelated + 'static) -> Self {
        Loader(Arc::new(loader))
    }
}

impl fmt::Debug for Loader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Loader")
    }
}

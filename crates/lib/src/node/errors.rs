//! Error types for node construction and transformation.
//!
//! Two hard-error classes exist: invalid input (normalization received
//! data it cannot model) and invalid argument (a transformation received a
//! structurally invalid argument). Both surface synchronously to the
//! caller and are never retried — the core is a pure computation, so a
//! failure is deterministic for a given input. Missing keys are not
//! errors; they produce diagnostics and sentinels (see [`crate::diag`]).

use thiserror::Error;

/// Structured errors for node construction and transformation.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum NodeError {
    /// Input contained a float with no usable value semantics.
    #[error("invalid input: non-finite number {value} cannot be modeled")]
    NonFiniteNumber { value: f64 },

    /// Input nesting exceeded the construction depth cap.
    #[error("invalid input: nesting deeper than {limit} levels")]
    DepthExceeded { limit: usize },

    /// `chunk` was given a zero size.
    #[error("invalid argument: chunk size must be a positive integer")]
    InvalidChunkSize,

    /// A flat-only operation was applied to a collection with nested
    /// elements.
    #[error("invalid argument: {operation} requires a flat collection")]
    FlatCollectionRequired { operation: &'static str },

    /// A row-only operation was applied to a collection with scalar
    /// elements.
    #[error("invalid argument: {operation} requires a collection of rows")]
    RowCollectionRequired { operation: &'static str },

    /// `related` was called but no loader was injected at construction.
    #[error("invalid argument: no related-record loader configured")]
    LoaderMissing,
}

impl NodeError {
    /// Check if this error is in the invalid-input class.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            NodeError::NonFiniteNumber { .. } | NodeError::DepthExceeded { .. }
        )
    }

    /// Check if this error is in the invalid-argument class.
    pub fn is_invalid_argument(&self) -> bool {
        !self.is_invalid_input()
    }

    /// Get the operation name if this is an operation-shape error.
    pub fn operation(&self) -> Option<&str> {
        match self {
            NodeError::FlatCollectionRequired { operation }
            | NodeError::RowCollectionRequired { operation } => Some(operation),
            _ => None,
        }
    }
}

impl From<NodeError> for crate::Error {
    fn from(err: NodeError) -> Self {
        crate::Error::Node(err)
    }
}

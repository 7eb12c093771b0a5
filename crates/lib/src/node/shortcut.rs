//! Blank-value shortcut operations and the termination-responder boundary.
//!
//! Each `or_*` operation inspects whether its receiver is blank — null,
//! `false`, empty string, empty collection, or the absent sentinel. A
//! non-blank receiver passes through unchanged, so the operations slot
//! into a chain; a blank one notifies the tree's [`Respond`] collaborator
//! and returns the matching [`Shortcut`] error so `?` stops the chain.
//! The core decides *whether* to respond, never how the effect renders.

use thiserror::Error;

use super::{Item, Node};

/// Termination responders invoked when a shortcut operation trips.
///
/// All methods default to no-ops; implementations are boundary concerns
/// (process exit, HTTP 404 page, redirect response).
pub trait Respond: Send + Sync {
    /// `or_die` tripped.
    fn die(&self, _message: &str) {}

    /// `or_404` tripped.
    fn not_found(&self, _message: &str) {}

    /// `or_redirect` tripped.
    fn redirect(&self, _url: &str) {}
}

/// The silent default responder.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRespond;

impl Respond for NoRespond {}

/// Chain-stopping outcomes of the shortcut operations.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Shortcut {
    /// `or_die` tripped on a blank value.
    #[error("terminated: {0}")]
    Terminated(String),

    /// `or_404` tripped on a blank value.
    #[error("not found: {0}")]
    NotFound(String),

    /// `or_throw` tripped on a blank value.
    #[error("{0}")]
    Raised(String),

    /// `or_redirect` tripped on a blank value.
    #[error("redirected to {0}")]
    Redirected(String),
}

impl Shortcut {
    /// Check if this is the not-found outcome.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Shortcut::NotFound(_))
    }

    /// Check if this is the redirect outcome.
    pub fn is_redirect(&self) -> bool {
        matches!(self, Shortcut::Redirected(_))
    }

    /// The message or URL carried by the outcome.
    pub fn detail(&self) -> &str {
        match self {
            Shortcut::Terminated(s)
            | Shortcut::NotFound(s)
            | Shortcut::Raised(s)
            | Shortcut::Redirected(s) => s,
        }
    }
}

impl From<Shortcut> for crate::Error {
    fn from(err: Shortcut) -> Self {
        crate::Error::Shortcut(err)
    }
}

macro_rules! shortcut_ops {
    ($ty:ty) => {
        impl $ty {
            /// Passes a non-blank value through; on blank, notifies the
            /// responder and stops the chain with
            /// [`Shortcut::Terminated`].
            pub fn or_die(self, message: &str) -> crate::Result<Self> {
                if self.is_blank() {
                    self.responder().die(message);
                    Err(Shortcut::Terminated(message.to_string()).into())
                } else {
                    Ok(self)
                }
            }

            /// Passes a non-blank value through; on blank, notifies the
            /// responder and stops the chain with [`Shortcut::NotFound`].
            pub fn or_404(self, message: &str) -> crate::Result<Self> {
                if self.is_blank() {
                    self.responder().not_found(message);
                    Err(Shortcut::NotFound(message.to_string()).into())
                } else {
                    Ok(self)
                }
            }

            /// Passes a non-blank value through; on blank, stops the chain
            /// with [`Shortcut::Raised`]. No responder is involved — the
            /// error itself is the effect.
            pub fn or_throw(self, message: &str) -> crate::Result<Self> {
                if self.is_blank() {
                    Err(Shortcut::Raised(message.to_string()).into())
                } else {
                    Ok(self)
                }
            }

            /// Passes a non-blank value through; on blank, notifies the
            /// responder and stops the chain with
            /// [`Shortcut::Redirected`].
            pub fn or_redirect(self, url: &str) -> crate::Result<Self> {
                if self.is_blank() {
                    self.responder().redirect(url);
                    Err(Shortcut::Redirected(url.to_string()).into())
                } else {
                    Ok(self)
                }
            }
        }
    };
}

shortcut_ops!(Node);
shortcut_ops!(Item);

impl Node {
    /// Blankness of a whole node: true iff it has no entries.
    pub fn is_blank(&self) -> bool {
        self.is_empty()
    }

    fn responder(&self) -> std::sync::Arc<dyn Respond> {
        self.0.context.responder.clone()
    }
}

impl Item {
    fn responder(&self) -> std::sync::Arc<dyn Respond> {
        self.context().responder.clone()
    }
}

//! Missing-key and deprecated-usage diagnostics.
//!
//! Diagnostics never interrupt control flow: a missing key still yields a
//! chain-safe sentinel, a deprecated call still executes. Two process-wide
//! toggles gate where notices go — a user-visible warning channel routed
//! through the installed [`Sink`], and a log-oriented reporting channel
//! emitted at debug level. Both are cheap no-ops when off.
//!
//! Tests that flip the toggles should hold a [`ToggleGuard`] so the
//! process-wide state is restored on drop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, LazyLock, RwLock};

/// Receiver for the user-visible warning channel.
pub trait Sink: Send + Sync {
    /// A key lookup found nothing; `context` describes the queried node.
    fn missing_key(&self, key: &str, context: &str);

    /// A superseded operation name was called.
    fn deprecated(&self, message: &str);
}

/// Default sink: warnings go to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl Sink for TracingSink {
    fn missing_key(&self, key: &str, context: &str) {
        tracing::warn!(key, context, "missing key");
    }

    fn deprecated(&self, message: &str) {
        tracing::warn!(detail = message, "deprecated usage");
    }
}

// Warnings default on (legacy behavior), reporting defaults off.
static WARNINGS: AtomicBool = AtomicBool::new(true);
static REPORTING: AtomicBool = AtomicBool::new(false);

static SINK: LazyLock<RwLock<Arc<dyn Sink>>> =
    LazyLock::new(|| RwLock::new(Arc::new(TracingSink)));

/// Returns whether the user-visible warning channel is on.
pub fn warnings_enabled() -> bool {
    WARNINGS.load(Ordering::Relaxed)
}

/// Returns whether the log-oriented reporting channel is on.
pub fn reporting_enabled() -> bool {
    REPORTING.load(Ordering::Relaxed)
}

/// Toggles the user-visible warning channel; returns the previous state.
pub fn set_warnings(enabled: bool) -> bool {
    WARNINGS.swap(enabled, Ordering::Relaxed)
}

/// Toggles the log-oriented reporting channel; returns the previous state.
pub fn set_reporting(enabled: bool) -> bool {
    REPORTING.swap(enabled, Ordering::Relaxed)
}

/// Installs a replacement warning sink process-wide.
pub fn set_sink(sink: Arc<dyn Sink>) {
    if let Ok(mut slot) = SINK.write() {
        *slot = sink;
    }
}

/// Saves both toggles and restores them on drop.
///
/// # Examples
///
/// ```
/// let guard = espalier::diag::ToggleGuard::save();
/// espalier::diag::set_warnings(false);
/// drop(guard); // previous state restored
/// ```
#[derive(Debug)]
pub struct ToggleGuard {
    warnings: bool,
    reporting: bool,
}

impl ToggleGuard {
    /// Captures the current toggle state.
    pub fn save() -> Self {
        Self {
            warnings: warnings_enabled(),
            reporting: reporting_enabled(),
        }
    }

    /// Captures the current state and turns both channels off.
    pub fn silenced() -> Self {
        let guard = Self::save();
        set_warnings(false);
        set_reporting(false);
        guard
    }
}

impl Drop for ToggleGuard {
    fn drop(&mut self) {
        set_warnings(self.warnings);
        set_reporting(self.reporting);
    }
}

pub(crate) fn missing_key(key: &crate::key::Key, context: &str) {
    if warnings_enabled() {
        if let Ok(sink) = SINK.read() {
            sink.missing_key(&key.to_string(), context);
        }
    }
    if reporting_enabled() {
        tracing::debug!(target: "espalier::diag", key = %key, context, "missing key");
    }
}

pub(crate) fn deprecated(message: &str) {
    if warnings_enabled() {
        if let Ok(sink) = SINK.read() {
            sink.deprecated(message);
        }
    }
    if reporting_enabled() {
        tracing::debug!(target: "espalier::diag", detail = message, "deprecated usage");
    }
}

/*! Integration tests for Espalier.
 *
 * This test suite is organized as a single integration test binary
 * following the pattern described by matklad in
 * https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html
 *
 * The module structure mirrors the main library structure:
 * - normalize: construction from plain data and its failure modes
 * - access: lookup, positional access, listing, materialization
 * - absent: chain-safety of the missing-data sentinel
 * - convert: raw/escaped mode switching and identity rules
 * - position: positional metadata invariants
 * - transform: the transformation pipeline (filtering, grouping,
 *   reshaping, rendering)
 * - shortcut: blank-value shortcut operations and responders
 * - diag: diagnostic sink and toggle behavior
 * - loader: lazy related-record loading
 * - serialize: serde integration and the list/object key rule
 */

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("espalier=info".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

mod access;
mod serialize;
mod shortcut;
mod transform;

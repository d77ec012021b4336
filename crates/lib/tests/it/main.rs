/*! Integration tests for strata.
 *
 * This test suite is organized as a single integration test binary
 * following the pattern described by matklad in
 * https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html
 *
 * The module structure mirrors the main library structure:
 * - resolution: Layered set/get behavior, weights, force, decomposition
 * - merging: Deep-merge semantics through full resolutions
 * - conditions: Conditional assignments and gates
 * - references: Cross-references, deferred computations, recursion guard
 * - cursor: The path-bound accessor layer
 * - errors: Error kinds, helpers, and propagation
 */

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("strata=info".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

mod conditions;
mod errors;
mod resolution;

//! Log output for the binary.
//!
//! Events are compact one-liners without module targets. `RUST_LOG` wins when set;
//! otherwise the level is `info`, or `debug` with `--verbose`:
//!
//! ```bash
//! RUST_LOG=entity_store=debug,territory_service=info territory-service serve
//! ```

use tracing_subscriber::EnvFilter;

pub fn setup_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

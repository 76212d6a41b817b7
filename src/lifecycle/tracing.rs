//! # Logging Setup
//!
//! [`setup_tracing`] installs a `tracing_subscriber::fmt` subscriber filtered by
//! `RUST_LOG` when it is set, otherwise by `logging.filter` from the engine config.
//! Module paths are hidden (`with_target(false)`); spans carry the app name and
//! namespace instead.
//!
//! ```bash
//! # Per-child details, including resolved images
//! RUST_LOG=debug appnest
//!
//! # Store traffic only
//! RUST_LOG=appnest_store=debug appnest
//! ```
//!
//! With `RUST_LOG=debug` a pass for a parent with one service reads roughly:
//!
//! ```text
//! DEBUG derive_children{app=web namespace=acorn}:get{key=ObjectKey { namespace: "acorn", name: "web-db" } kind="DevSessionInstance"}: Sending request
//! DEBUG derive_children{app=web namespace=acorn}: Derived child child="db" name=web-db image=postgres:16
//! INFO derive_children{app=web namespace=acorn}: Derivation complete children=1
//! ```

use crate::config::LoggingConfig;
use tracing_subscriber::EnvFilter;

pub fn setup_tracing(config: &LoggingConfig) {
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|_| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(&config.filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    // A second call (e.g. from tests) leaves the first subscriber in place.
    let _ = if config.compact {
        builder.compact().try_init()
    } else {
        builder.try_init()
    };
}

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber for runtime diagnostics.
///
/// Does nothing unless `RUST_LOG` is set, and only ever installs once.
/// Enable with `RUST_LOG=es_eval=debug` (calls, construction, imports) or
/// `RUST_LOG=es_eval=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}

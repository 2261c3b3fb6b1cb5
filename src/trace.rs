//! Log setup for hosts, demos and tests.
//!
//! Service libraries only emit through `tracing`; whoever loads them decides
//! whether a subscriber is installed.

/// Install a fmt subscriber filtered by `RUST_LOG`
/// (default `service_bridge=info`). Calling it twice is harmless.
pub fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("service_bridge=info"));

    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_names(true)
                .with_file(false)
                .with_line_number(false)
                .with_timer(fmt::time::uptime()),
        )
        .with(filter)
        .try_init();
}

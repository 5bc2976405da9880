use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global tracing subscriber, filtered by `RUST_LOG`.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // Rocket may already have installed its own logger; keep whichever came first.
    let _ = fmt().with_env_filter(filter).try_init();
}

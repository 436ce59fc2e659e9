//! Tracing subscriber setup

use tracing::Level;

/// Install the global subscriber: browser console on wasm, stderr elsewhere.
///
/// Only the first call has any effect.
#[cfg(target_arch = "wasm32")]
pub fn init_logging(level: Level) {
    use tracing_subscriber::filter::LevelFilter;
    use tracing_subscriber::prelude::*;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .without_time()
        .with_writer(tracing_web::MakeWebConsoleWriter::new());

    if tracing_subscriber::registry()
        .with(LevelFilter::from_level(level))
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        debug!("Logging already initialised");
    }
}

/// Install the global subscriber: browser console on wasm, stderr elsewhere.
///
/// `RUST_LOG` overrides `level` when set. Only the first call has any effect.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging(level: Level) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_ascii_lowercase()));

    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_err()
    {
        debug!("Logging already initialised");
    }
}

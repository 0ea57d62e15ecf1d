//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace, LevelFilter};

/// Initialize the logging system from `RUST_LOG`
pub fn init() {
    env_logger::init();
}

/// Initialize logging with a default level, still overridable through `RUST_LOG`.
///
/// Returns `false` if a logger was already installed.
pub fn init_with_level(level: LevelFilter) -> bool {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init()
        .is_ok()
}

/// Parse a level name from configuration, falling back to `Info`
pub fn parse_level(name: &str) -> LevelFilter {
    name.parse().unwrap_or_else(|_| {
        warn!("Unknown log level '{}', using info", name);
        LevelFilter::Info
    })
}

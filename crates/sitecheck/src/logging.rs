//! Logging setup.
//!
//! `RUST_LOG` takes precedence over the default filter. Initialisation is
//! idempotent: every test may call [`init_for_tests`], only the first call
//! installs the subscriber.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "sitecheck=info";

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// Install the global subscriber with human-readable output.
/// Returns `false` if a subscriber was already installed.
pub fn init() -> bool {
    init_with(LogFormat::Pretty)
}

/// Install the global subscriber with the given format, writing to stdout
pub fn init_with(format: LogFormat) -> bool {
    let registry = tracing_subscriber::registry().with(filter());
    let result = match format {
        LogFormat::Pretty => registry.with(fmt::layer()).try_init(),
        LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
    };
    result.is_ok()
}

/// Install a human-readable subscriber whose output is captured by the test
/// harness. For test binaries only.
pub fn init_for_tests() -> bool {
    tracing_subscriber::registry()
        .with(filter())
        .with(fmt::layer().with_test_writer())
        .try_init()
        .is_ok()
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        let _ = init_for_tests();
        assert!(!init_for_tests());
        assert!(!init());
        assert!(!init_with(LogFormat::Json));
    }
}

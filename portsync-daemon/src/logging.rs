//! tracing-subscriber setup.

use portsync_core::{LogFormat, LogLevel};

/// Install the global subscriber. `RUST_LOG` wins over `level` when set.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing(level: LogLevel, format: LogFormat) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_filter()));
    let verbose = level.is_verbose();

    let _ = match format {
        LogFormat::Json => fmt()
            .json()
            .with_env_filter(filter)
            .with_target(verbose)
            .try_init(),
        LogFormat::Text => fmt()
            .with_env_filter(filter)
            .with_target(verbose)
            .with_file(verbose)
            .with_line_number(verbose)
            .try_init(),
    };
}

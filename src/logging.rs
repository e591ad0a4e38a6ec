use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding an `EnvFilter` directive, e.g. `data_guardian=debug`.
pub const LOG_ENV: &str = "DATA_GUARDIAN_LOG";

/// Install the stderr subscriber. `verbose` lowers the default level to debug.
pub fn init(verbose: bool) {
    let default = if verbose { "data_guardian=debug" } else { "data_guardian=warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

    // A subscriber may already be installed (e.g. by a test harness).
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .try_init();
}

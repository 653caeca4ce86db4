//! Subscriber setup for the CLI.

use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Level for the msggen crates at a given `-v` count.
pub fn level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Install the global subscriber. `RUST_LOG` takes precedence over `-v`.
pub fn init(verbose: u8) {
    let level = level(verbose);
    let default_filter = format!(
        "msggen_core={level},msggen_schema={level},msggen_codegen={level},msggen={level}"
    );
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        fmt::layer()
            .with_target(verbose > 0)
            .with_writer(std::io::stderr),
    );

    // Already installed in tests
    let _ = subscriber.try_init();
}

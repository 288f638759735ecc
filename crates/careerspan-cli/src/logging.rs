use std::io::IsTerminal as _;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _};

const DEFAULT_DIRECTIVES: &str = "careerspan=info,careerspan_stats=info,careerspan_analysis=info";

/// Initialize the logging subsystem.
///
/// Logs go to stderr so reports written to stdout stay machine-readable.
/// `RUST_LOG` overrides the default filter; `verbose` raises the default to `debug`.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new(DEFAULT_DIRECTIVES.replace("=info", "=debug"))
        } else {
            EnvFilter::new(DEFAULT_DIRECTIVES)
        }
    });

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .without_time();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

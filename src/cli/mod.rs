//! Command-line interface.

pub mod generate;
pub mod output;
pub mod passwd;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber shared by both binaries.
///
/// Filter comes from the `RELCTL_LOG` env var, falling back to debug level
/// with `--verbose` and warnings otherwise.
pub fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("RELCTL_LOG").unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("relctl=debug")
        } else {
            EnvFilter::new("relctl=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).without_time())
        .init();
}

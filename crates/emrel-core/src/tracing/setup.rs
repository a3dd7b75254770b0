//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

const DEFAULT_FILTER: &str = "emrel=info,emrel_core=info,emrel_model=info,emrel_sim=info";

/// Initialize the emrel tracing/logging system.
///
/// Reads the `EMREL_LOG` environment variable for per-crate log levels.
/// Format: `EMREL_LOG=emrel_sim=debug,emrel_model=info`
///
/// Falls back to info for every emrel crate if `EMREL_LOG` is not set or is invalid.
/// Logs go to stderr; stdout is reserved for CSV output.
///
/// Calling it more than once is a no-op.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("EMREL_LOG")
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .init();
    });
}

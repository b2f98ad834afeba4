use std::sync::Once;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

static TRACING_INIT: Once = Once::new();

/// The filter directive for a verbosity level.
///
/// # Example
/// ```
/// use nepa::logging::level_directive;
///
/// assert_eq!(level_directive(0), "warn");
/// assert_eq!(level_directive(2), "debug");
/// assert_eq!(level_directive(9), "trace");
/// ```
#[must_use]
pub const fn level_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Installs the stderr subscriber once per process.
///
/// `RUST_LOG` wins over the verbosity level. At the highest verbosity the
/// output also shows targets and source lines.
pub fn init_tracing(verbosity: u8) {
    TRACING_INIT.call_once(|| {
                    let filter = EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| EnvFilter::new(level_directive(verbosity)));
                    let detailed = verbosity >= 4;
                    tracing_subscriber::registry().with(fmt::layer().with_writer(std::io::stderr)
                                                                    .with_target(detailed)
                                                                    .with_line_number(detailed))
                                                  .with(filter)
                                                  .try_init()
                                                  .ok();
                });
}

//! Tracing setup
//!
//! Logs go to stderr so they never interleave with tables on stdout.
//!
//! ```text
//! employee-tracker                         # warnings and errors only
//! employee-tracker --debug                 # debug level
//! RUST_LOG=employee_tracker=trace ...      # fine-grained control, wins over both
//! ```

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Filter used when neither `RUST_LOG` nor `--debug` is given
pub const DEFAULT_FILTER: &str = "warn";

/// Filter used for `--debug`
pub const DEBUG_FILTER: &str = "debug";

/// Build the filter: `RUST_LOG` if set, else the debug/default level
#[must_use]
pub fn build_filter(debug: bool) -> EnvFilter {
    let fallback = if debug { DEBUG_FILTER } else { DEFAULT_FILTER };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Install the global subscriber
pub fn init_tracing(debug: bool) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(debug))
        .with_writer(std::io::stderr)
        .with_target(debug)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}

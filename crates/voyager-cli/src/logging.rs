// SPDX-License-Identifier: Apache-2.0

//! Logging initialization for the Voyager CLI.
//!
//! Uses `tracing` with `tracing-subscriber`. Log lines go to stderr so that
//! stdout carries only per-issue results and the summary.
//!
//! # Examples
//!
//! ```bash
//! # Default: warnings only
//! voyager --config migrate.toml
//!
//! # Per-issue progress from the library
//! voyager --config migrate.toml -v
//!
//! # Debug output for troubleshooting
//! RUST_LOG=voyager_core=debug voyager --config migrate.toml
//! ```

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_FILTER: &str = "voyager=warn,voyager_core=warn,octocrab=error";
const VERBOSE_FILTER: &str = "voyager=info,voyager_core=info,octocrab=error";

/// Returns the filter directives used when `RUST_LOG` is not set.
pub fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        VERBOSE_FILTER
    } else {
        DEFAULT_FILTER
    }
}

/// Initialize the logging subsystem.
///
/// `RUST_LOG` takes precedence; otherwise `verbose` raises the library to info.
pub fn init_logging(verbose: bool) {
    let fmt_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    let filter_layer = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_parse() {
        for verbose in [false, true] {
            assert!(EnvFilter::try_new(default_directives(verbose)).is_ok());
        }
    }

    #[test]
    fn test_verbose_raises_core_level() {
        assert!(default_directives(true).contains("voyager_core=info"));
        assert!(default_directives(false).contains("voyager_core=warn"));
    }
}

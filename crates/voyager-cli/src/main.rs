// SPDX-License-Identifier: Apache-2.0

//! Voyager - migrate GitHub issues to another repository or a Jira CSV.
//!
//! Reads a migration file, runs the migration, prints one line per issue and
//! a final summary. The process fails only when the run as a whole fails;
//! individual issue failures are reported in the summary.

mod cli;
mod commands;
mod errors;
mod logging;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use crate::cli::{Cli, OutputContext};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let output_ctx = OutputContext::from_cli(cli.output, cli.verbose);

    let result = async {
        let config = voyager_core::load_config(cli.config.as_deref())
            .context("Failed to load configuration")?;
        debug!(kind = %config.migration_type, "Configuration loaded successfully");

        let summary = commands::migrate::run(&config, cli.dry_run, &output_ctx).await?;
        output::render(&summary, &output_ctx)
    }
    .await;

    if let Err(e) = &result {
        eprintln!("Error: {}", errors::format_error(e));
    }
    result
}

// SPDX-License-Identifier: Apache-2.0

//! Runs one migration and streams per-issue results to stdout.

use std::io;

use anyhow::{Context, Result};
use console::style;
use tracing::{debug, warn};
use voyager_core::{MigrationConfig, MigrationKind, MigrationSummary, RunOptions, run_migration};

use super::maybe_spinner;
use crate::cli::OutputContext;
use crate::output;

/// Runs the migration described by `config`.
pub async fn run(
    config: &MigrationConfig,
    dry_run: bool,
    ctx: &OutputContext,
) -> Result<MigrationSummary> {
    let source = config.source.repo_ref();
    if ctx.is_text() {
        let mode = if dry_run { " (dry run)" } else { "" };
        println!(
            "Migrating issues from {} to {}{mode}",
            style(&source).bold(),
            style(target_label(config)).bold()
        );
    }

    let mut spinner = maybe_spinner(ctx, "Selecting issues...");
    let show_lines = ctx.is_text();

    let options = RunOptions {
        dry_run,
        ..RunOptions::default()
    };
    let result = run_migration(config, options, |outcome| {
        if let Some(s) = spinner.take() {
            s.finish_and_clear();
        }
        if show_lines {
            if let Err(e) = output::render_outcome(&mut io::stdout(), outcome, dry_run) {
                warn!(error = %e, "Failed to write outcome line");
            }
        }
    })
    .await;

    if let Some(s) = spinner {
        s.finish_and_clear();
    }

    let summary = result.with_context(|| format!("Migration from {source} failed"))?;
    debug!(
        attempted = summary.attempted,
        failed = summary.failed,
        "Migration finished"
    );
    Ok(summary)
}

/// Human-readable destination for the banner line.
fn target_label(config: &MigrationConfig) -> String {
    match &config.destination {
        Some(dest) if config.migration_type == MigrationKind::GitHub => {
            dest.repo_ref().to_string()
        }
        _ => config
            .options
            .export_path
            .join(format!("{}.csv", config.source.name))
            .display()
            .to_string(),
    }
}

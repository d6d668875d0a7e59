// SPDX-License-Identifier: Apache-2.0

use console::style;
use std::io::{self, Write};

use voyager_core::{MigrationOutcome, MigrationSummary};

use super::Renderable;
use crate::cli::OutputContext;

/// Writes one line for a finished issue.
pub fn render_outcome(
    w: &mut dyn Write,
    outcome: &MigrationOutcome,
    dry_run: bool,
) -> io::Result<()> {
    match outcome {
        MigrationOutcome::Migrated {
            source,
            destination: Some(created),
        } => writeln!(
            w,
            "  {} #{source} -> {}",
            style("✓").green(),
            style(&created.url).cyan()
        ),
        MigrationOutcome::Migrated { source, .. } => {
            let action = if dry_run { "would migrate" } else { "exported" };
            writeln!(w, "  {} #{source} {action}", style("✓").green())
        }
        MigrationOutcome::Skipped { source, reason } => writeln!(
            w,
            "  {} #{source} skipped: {}",
            style("-").yellow(),
            style(reason).dim()
        ),
        MigrationOutcome::Failed { source, error } => {
            writeln!(w, "  {} #{source} {}", style("✗").red(), style(error).red())
        }
    }
}

impl Renderable for MigrationSummary {
    fn render_text(&self, w: &mut dyn Write, _ctx: &OutputContext) -> io::Result<()> {
        writeln!(w)?;
        if self.is_empty() {
            writeln!(w, "{}", style("No issues found").yellow())?;
            return Ok(());
        }

        let title = if self.dry_run {
            "Dry Run Summary"
        } else {
            "Migration Summary"
        };
        let title_style = if self.all_succeeded() {
            style(title).bold().green()
        } else {
            style(title).bold().yellow()
        };
        writeln!(w, "{title_style}")?;
        writeln!(w, "{}", style("=".repeat(title.len())).dim())?;
        writeln!(w, "  Succeeded: {}", style(self.succeeded).green())?;
        writeln!(w, "  Failed:    {}", style(self.failed).red())?;
        writeln!(w, "  Skipped:   {}", style(self.skipped).yellow())?;
        writeln!(w, "  Total:     {}", self.attempted)?;
        if let Some(path) = &self.export_file {
            writeln!(w, "  Exported:  {}", style(path.display()).cyan())?;
        }
        if !self.all_succeeded() {
            writeln!(
                w,
                "  {}",
                style("Some issues failed; see the lines above for details.").red()
            )?;
        }
        writeln!(w)?;
        Ok(())
    }
}

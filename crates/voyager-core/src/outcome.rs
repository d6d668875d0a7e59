// SPDX-License-Identifier: Apache-2.0

//! Per-issue outcomes and the run summary.

use std::path::PathBuf;

use serde::Serialize;

use crate::model::DestinationIssue;

/// Result of visiting one selection slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MigrationOutcome {
    /// Issue was written (or buffered, in export mode).
    Migrated {
        /// Source issue number.
        source: u64,
        /// Created destination issue (recreate mode only).
        destination: Option<DestinationIssue>,
    },
    /// Slot was not migrated, e.g. a requested number that does not exist.
    Skipped {
        /// Source issue number.
        source: u64,
        /// Why the slot was skipped.
        reason: String,
    },
    /// Migration of this issue failed; later issues were still attempted.
    Failed {
        /// Source issue number.
        source: u64,
        /// Failure message.
        error: String,
    },
}

impl MigrationOutcome {
    /// Source issue number this outcome refers to.
    #[must_use]
    pub fn source(&self) -> u64 {
        match self {
            MigrationOutcome::Migrated { source, .. }
            | MigrationOutcome::Skipped { source, .. }
            | MigrationOutcome::Failed { source, .. } => *source,
        }
    }
}

/// Totals for a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationSummary {
    /// Selection slots visited.
    pub attempted: usize,
    /// Issues migrated.
    pub succeeded: usize,
    /// Issues that failed.
    pub failed: usize,
    /// Slots skipped without a sink call.
    pub skipped: usize,
    /// Whether this was a dry run.
    pub dry_run: bool,
    /// Written export file, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_file: Option<PathBuf>,
    /// Outcomes in visit order.
    pub outcomes: Vec<MigrationOutcome>,
}

impl MigrationSummary {
    pub(crate) fn record(&mut self, outcome: MigrationOutcome) {
        self.attempted += 1;
        match outcome {
            MigrationOutcome::Migrated { .. } => self.succeeded += 1,
            MigrationOutcome::Skipped { .. } => self.skipped += 1,
            MigrationOutcome::Failed { .. } => self.failed += 1,
        }
        self.outcomes.push(outcome);
    }

    /// True when nothing was selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attempted == 0
    }

    /// True when no issue failed.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

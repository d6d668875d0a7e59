// SPDX-License-Identifier: Apache-2.0

//! Drives selection, transformation and output for one run.
//!
//! Issues are visited strictly one at a time, in selection order. Anything
//! that goes wrong with a single issue is recorded as a
//! [`MigrationOutcome::Failed`] and the loop moves on; only selection and the
//! final flush can end a run early.

use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};

use crate::Result;
use crate::error::VoyagerError;
use crate::mapping::MappingTable;
use crate::model::{DestinationIssue, RepoRef, SourceIssue};
use crate::outcome::{MigrationOutcome, MigrationSummary};
use crate::selector::{IssueSelector, Selected, SelectionCriteria, max_comment_count};
use crate::sink::{RunContext, Sink};
use crate::tracker::IssueTracker;
use crate::transform::{TransformMode, Transformer};

/// Actions taken on the source issue after it was migrated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostActions {
    /// Comment on the source issue with a link to the new issue.
    pub add_source_comment: bool,
    /// Close the source issue.
    pub close_source: bool,
}

/// Text of the back-reference comment left on a migrated source issue.
#[must_use]
pub fn back_reference(destination: &DestinationIssue) -> String {
    format!("Issue migrated to {}", destination.url)
}

/// One configured migration run.
pub struct Migration<'a> {
    tracker: &'a dyn IssueTracker,
    source: RepoRef,
    criteria: SelectionCriteria,
    transformer: Transformer,
    post: PostActions,
}

impl<'a> Migration<'a> {
    /// Creates a run reading from `source` through `tracker`.
    ///
    /// `now` anchors the relative comment timestamps written in recreate mode.
    #[must_use]
    pub fn new(
        tracker: &'a dyn IssueTracker,
        source: RepoRef,
        criteria: SelectionCriteria,
        mappings: MappingTable,
        mode: TransformMode,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            tracker,
            source,
            criteria,
            transformer: Transformer::new(mappings, mode, now),
            post: PostActions::default(),
        }
    }

    /// Enables post-migration actions on the source issue.
    #[must_use]
    pub fn with_post_actions(mut self, post: PostActions) -> Self {
        self.post = post;
        self
    }

    /// Runs the migration into `sink`, calling `on_outcome` after each slot.
    ///
    /// # Errors
    ///
    /// - [`VoyagerError::Selection`] if the source repository cannot be read.
    /// - [`VoyagerError::Io`] if the export file cannot be written.
    #[instrument(skip(self, sink, on_outcome), fields(source = %self.source, sink = sink.name()))]
    pub async fn run<F>(&self, sink: &mut dyn Sink, mut on_outcome: F) -> Result<MigrationSummary>
    where
        F: FnMut(&MigrationOutcome) + Send,
    {
        let selection = match IssueSelector::new(self.tracker, &self.source)
            .select(&self.criteria)
            .await
        {
            Ok(selection) => selection,
            Err(VoyagerError::NoIssuesFound) => {
                info!("Nothing to migrate");
                return Ok(MigrationSummary::default());
            }
            Err(e) => return Err(e),
        };

        sink.begin(&RunContext {
            total: selection.len(),
            max_comment_count: max_comment_count(&selection),
        });

        let mut summary = MigrationSummary::default();
        let mut deferred_close = Vec::new();

        for slot in &selection {
            let outcome = match slot {
                Selected::Missing { number, reason } => {
                    info!(number, "Skipping missing issue");
                    MigrationOutcome::Skipped {
                        source: *number,
                        reason: reason.clone(),
                    }
                }
                Selected::Issue(issue) => match self.migrate_one(issue, sink).await {
                    Ok(destination) => {
                        if let Some(created) = &destination {
                            self.annotate_source(issue.number, created).await;
                            if self.post.close_source {
                                self.close_source(issue.number).await;
                            }
                        } else if self.post.close_source {
                            deferred_close.push(issue.number);
                        }
                        info!(number = issue.number, "Issue migrated");
                        MigrationOutcome::Migrated {
                            source: issue.number,
                            destination,
                        }
                    }
                    Err(e) => {
                        warn!(number = issue.number, error = %e, "Issue migration failed");
                        MigrationOutcome::Failed {
                            source: issue.number,
                            error: e.to_string(),
                        }
                    }
                },
            };
            on_outcome(&outcome);
            summary.record(outcome);
        }

        summary.export_file = sink.flush().await?;

        // Buffered sinks only close sources once their output is safely written.
        if summary.export_file.is_some() {
            for number in deferred_close {
                self.close_source(number).await;
            }
        }

        info!(
            attempted = summary.attempted,
            succeeded = summary.succeeded,
            failed = summary.failed,
            skipped = summary.skipped,
            "Migration complete"
        );
        Ok(summary)
    }

    async fn migrate_one(
        &self,
        issue: &SourceIssue,
        sink: &mut dyn Sink,
    ) -> Result<Option<DestinationIssue>> {
        let comments = if issue.comment_count == 0 {
            Vec::new()
        } else {
            self.tracker
                .list_comments(&self.source, issue.number)
                .await
                .map_err(|e| {
                    VoyagerError::sink(issue.number, format!("could not fetch comments: {e}"))
                })?
        };

        let transformed = self.transformer.transform(issue, &comments);
        let receipt = sink.create(&transformed).await?;
        Ok(receipt.destination)
    }

    async fn annotate_source(&self, number: u64, destination: &DestinationIssue) {
        if !self.post.add_source_comment {
            return;
        }
        if let Err(e) = self
            .tracker
            .create_comment(&self.source, number, &back_reference(destination))
            .await
        {
            warn!(number, error = %e, "Failed to add back-reference comment");
        }
    }

    async fn close_source(&self, number: u64) {
        if let Err(e) = self.tracker.close_issue(&self.source, number).await {
            warn!(number, error = %e, "Failed to close source issue");
        }
    }
}
